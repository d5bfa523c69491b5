use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use vera_core::{Turn, VeraError};

use crate::provider::{ProviderReply, ProviderRequest};
use crate::registry::ProviderRegistry;
use crate::traits::Classifier;

/// Back-reference phrases that ask for prior turns to be considered.
const BACK_REFERENCE_PHRASES: &[&str] = &[
    "como dijiste",
    "como mencionaste",
    "lo que dijiste",
    "lo que mencionaste",
    "antes dijiste",
    "anteriormente",
    "como antes",
    "la vez anterior",
];

/// Does the message lean on earlier turns for its meaning?
pub fn wants_history(message: &str) -> bool {
    let lowered = message.to_lowercase();
    BACK_REFERENCE_PHRASES.iter().any(|p| lowered.contains(p))
}

/// Role-labeled transcript lines followed by the current message.
fn with_history(message: &str, history: &[Turn]) -> String {
    if history.is_empty() {
        return message.to_string();
    }
    let transcript: Vec<String> = history.iter().map(Turn::transcript_line).collect();
    format!("{}\n\n{}", transcript.join("\n"), message)
}

/// The routing outcome: which provider ran and what it said.
#[derive(Debug, Clone)]
pub struct Routed {
    pub provider: String,
    pub reply: ProviderReply,
}

/// Delegates provider selection to an external single-choice classifier and
/// executes the chosen provider exactly once, bounded by a timeout.
///
/// Selection correctness is the classifier's job; this router guarantees the
/// answer resolves to a registered provider (or errors), and that provider
/// failures surface as structured errors rather than raw panics/exceptions.
pub struct CapabilityRouter {
    registry: ProviderRegistry,
    classifier: Arc<dyn Classifier>,
    timeout: Duration,
}

impl CapabilityRouter {
    pub fn new(
        registry: ProviderRegistry,
        classifier: Arc<dyn Classifier>,
        timeout: Duration,
    ) -> Self {
        Self { registry, classifier, timeout }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Route one resolved message. No retries: classifier calls and live
    /// fetches are costly and not guaranteed idempotent.
    pub async fn route(&self, request: &ProviderRequest) -> Result<Routed, VeraError> {
        let input = if wants_history(&request.query) {
            with_history(&request.query, &request.history)
        } else {
            request.query.clone()
        };

        let cards = self.registry.cards();
        let name = self
            .classifier
            .select(&input, &cards)
            .await
            .map_err(|err| {
                warn!(error = %err, "classifier failed to select a provider");
                VeraError::Routing(format!("classifier returned no selection: {err}"))
            })?;

        let provider = self.registry.get(&name).ok_or_else(|| {
            warn!(selected = %name, query = %request.query, "unregistered provider selected");
            VeraError::Routing(format!("'{name}' is not a registered provider"))
        })?;

        info!(provider = %name, "routing query");

        let routed_request = ProviderRequest { query: input, ..request.clone() };
        let reply = match tokio::time::timeout(self.timeout, provider.execute(&routed_request)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => {
                return Err(VeraError::Provider { provider: name, source: err });
            }
            Err(_) => {
                return Err(VeraError::Provider {
                    provider: name,
                    source: anyhow::anyhow!("timed out after {:?}", self.timeout),
                });
            }
        };

        Ok(Routed { provider: name, reply })
    }
}
