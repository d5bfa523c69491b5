use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};
use uuid::Uuid;
use vera_core::config::{SessionConfig, VeraConfig};
use vera_resolver::ReferenceResolver;
use vera_session::SessionContextStore;

use crate::provider::{ProviderRequest, ReplyKind};
use crate::providers::{
    BusinessQueryProvider, GeneralChatProvider, ListingSearchProvider, PropertyDetailProvider,
    PropertyQuestionProvider,
};
use crate::registry::ProviderRegistry;
use crate::router::CapabilityRouter;
use crate::traits::{BusinessQuery, Classifier, Completion, ListingLookup, ListingSearch, WebFetch};

/// The uniform, non-technical failure text. Detail goes to the logs only.
pub const APOLOGY: &str = "Lo siento, tuve un problema al procesar tu solicitud. \
Por favor intenta de nuevo en unos momentos.";

/// Orchestrator knobs, usually taken from [`VeraConfig`].
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub ttl_secs: u64,
    pub memory_token_budget: usize,
    pub memory_window: usize,
    pub search_limit: u32,
    pub provider_timeout_secs: u64,
    pub listings_domain: String,
}

impl AssistantConfig {
    pub fn from_config(config: &VeraConfig) -> Self {
        let SessionConfig {
            ttl_secs,
            memory_token_budget,
            memory_window,
            search_limit,
            provider_timeout_secs,
        } = config.session.clone();
        Self {
            ttl_secs,
            memory_token_budget,
            memory_window,
            search_limit,
            provider_timeout_secs,
            listings_domain: config.listings.domain.clone(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            ttl_secs: session.ttl_secs,
            memory_token_budget: session.memory_token_budget,
            memory_window: session.memory_window,
            search_limit: session.search_limit,
            provider_timeout_secs: session.provider_timeout_secs,
            listings_domain: "bienesadjudicadoscr.com".into(),
        }
    }
}

/// External collaborators wired in at construction time.
pub struct Collaborators {
    pub classifier: Arc<dyn Classifier>,
    pub completion: Arc<dyn Completion>,
    pub search: Arc<dyn ListingSearch>,
    pub lookup: Arc<dyn ListingLookup>,
    pub web: Arc<dyn WebFetch>,
    pub business: Option<Arc<dyn BusinessQuery>>,
}

/// The conversational engine: resolves references, routes to one provider,
/// and maintains per-session state and memory.
pub struct Assistant {
    store: Arc<SessionContextStore>,
    resolver: ReferenceResolver,
    router: CapabilityRouter,
    memory_window: usize,
}

impl Assistant {
    pub fn new(config: AssistantConfig, collaborators: Collaborators) -> Self {
        let store = Arc::new(SessionContextStore::new(
            config.ttl_secs,
            config.memory_token_budget,
        ));

        let mut registry = ProviderRegistry::new()
            .register(Arc::new(ListingSearchProvider::new(
                collaborators.search,
                store.clone(),
                config.search_limit,
            )))
            .register(Arc::new(PropertyDetailProvider::new(
                collaborators.lookup.clone(),
                collaborators.web,
                collaborators.completion.clone(),
                store.clone(),
                config.listings_domain.clone(),
            )))
            .register(Arc::new(PropertyQuestionProvider::new(
                collaborators.lookup,
            )));
        if let Some(business) = collaborators.business {
            registry = registry.register(Arc::new(BusinessQueryProvider::new(business)));
        }
        registry = registry.register(Arc::new(GeneralChatProvider::new(collaborators.completion)));

        let router = CapabilityRouter::new(
            registry,
            collaborators.classifier,
            Duration::from_secs(config.provider_timeout_secs),
        );

        Self {
            store,
            resolver: ReferenceResolver::new(&config.listings_domain),
            router,
            memory_window: config.memory_window,
        }
    }

    pub fn store(&self) -> Arc<SessionContextStore> {
        self.store.clone()
    }

    /// Process one user turn and return the response text.
    ///
    /// Turns for the same session run one at a time; turns for different
    /// sessions proceed independently.
    pub async fn handle_turn(
        &self,
        session_id: &str,
        raw_message: &str,
        display_name: Option<&str>,
    ) -> String {
        let turn_id = format!("turn_{}", Uuid::new_v4().simple());
        let slot = self.store.get_or_create(session_id);
        let _gate = slot.gate.lock().await;

        let state = slot.state();
        let window = slot.memory_window(self.memory_window);
        let resolution = self.resolver.resolve(raw_message, &state, &window);
        if resolution.rewritten() {
            info!(%turn_id, session_id, resolved = %resolution.text, "reference resolved");
        }

        let request = ProviderRequest {
            session_id: session_id.to_string(),
            query: resolution.text,
            history: window,
            display_name: display_name.map(str::to_string),
        };

        match self.router.route(&request).await {
            Ok(routed) => {
                info!(%turn_id, session_id, provider = %routed.provider, kind = ?routed.reply.kind, "turn completed");
                if routed.reply.kind == ReplyKind::Conversational {
                    slot.push_exchange(raw_message, &routed.reply.text);
                }
                routed.reply.text
            }
            Err(err) => {
                error!(%turn_id, session_id, message = raw_message, error = %err, "turn failed");
                APOLOGY.to_string()
            }
        }
    }

    /// Wipe a session's state and transcript. Returns whether it existed.
    pub fn clear_session(&self, session_id: &str) -> bool {
        info!(session_id, "clearing session");
        self.store.clear(session_id)
    }

    /// Personalized first-contact greeting.
    pub fn greeting(&self, display_name: Option<&str>) -> String {
        match display_name {
            Some(name) if !name.trim().is_empty() => format!(
                "¡Hola {}! Soy VERA, tu asistente de propiedades. ¿En qué puedo ayudarte hoy?",
                name.trim()
            ),
            _ => "¡Hola! Soy VERA, tu asistente de propiedades. ¿En qué puedo ayudarte hoy?"
                .to_string(),
        }
    }
}
