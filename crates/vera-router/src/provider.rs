use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use vera_core::Turn;

/// How a provider's reply should be treated downstream.
///
/// `Conversational` replies are written to the session transcript;
/// `Stateful` replies carry tool output that lives in the session context
/// store instead and never enters the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplyKind {
    Conversational,
    Stateful,
}

/// A provider's tagged result.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderReply {
    pub kind: ReplyKind,
    pub text: String,
}

impl ProviderReply {
    pub fn conversational(text: impl Into<String>) -> Self {
        Self { kind: ReplyKind::Conversational, text: text.into() }
    }

    pub fn stateful(text: impl Into<String>) -> Self {
        Self { kind: ReplyKind::Stateful, text: text.into() }
    }
}

/// One query as the router and providers see it.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub session_id: String,
    /// Resolved (and possibly history-augmented) message text.
    pub query: String,
    /// Recent transcript window, oldest first.
    pub history: Vec<Turn>,
    pub display_name: Option<String>,
}

impl ProviderRequest {
    pub fn new(session_id: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            query: query.into(),
            history: Vec::new(),
            display_name: None,
        }
    }
}

/// Name + natural-language capability description, as shown to the external
/// classifier. The description is never used by programmatic logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderCard {
    pub name: String,
    pub description: String,
}

/// A registered capability backend.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// What this provider can answer, for the classifier's eyes only.
    fn description(&self) -> &str;

    async fn execute(&self, request: &ProviderRequest) -> anyhow::Result<ProviderReply>;

    fn card(&self) -> ProviderCard {
        ProviderCard {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}
