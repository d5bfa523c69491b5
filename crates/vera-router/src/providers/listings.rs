use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;
use vera_filter::SearchRequest;
use vera_session::SessionContextStore;

use crate::provider::{Provider, ProviderReply, ProviderRequest};
use crate::traits::ListingSearch;

/// How many results are rendered even when the backend returns more.
const DISPLAY_CAP: usize = 10;

const NO_CRITERIA_TEXT: &str = "Necesito al menos una provincia, un precio máximo \
o una palabra clave para buscar. ¿Qué tipo de propiedad estás buscando?";

const NO_RESULTS_TEXT: &str = "No encontré resultados para tu búsqueda.";

/// Structured catalog search: free text in, bounded parameterized query out.
pub struct ListingSearchProvider {
    search: Arc<dyn ListingSearch>,
    store: Arc<SessionContextStore>,
    limit: u32,
}

impl ListingSearchProvider {
    pub fn new(
        search: Arc<dyn ListingSearch>,
        store: Arc<SessionContextStore>,
        limit: u32,
    ) -> Self {
        Self { search, store, limit }
    }

    fn render(results: &[vera_core::Listing]) -> String {
        let mut lines = vec!["**Resultados:**\n".to_string()];
        for (i, listing) in results.iter().take(DISPLAY_CAP).enumerate() {
            lines.push(format!("{}. {}", i + 1, listing.summary_line()));
        }
        lines.push("\n---\n".into());
        lines.push("💡 **¿Quieres más detalles?**".into());
        lines.push("Puedes decirme:".into());
        lines.push("• _\"Dime más sobre la #1\"_ (para cualquier número)".into());
        lines.push("• _\"Info detallada del terreno en Moravia\"_ (por nombre/ubicación)".into());
        lines.push("• _O pega el enlace directo para análisis completo_".into());
        lines.join("\n")
    }
}

#[async_trait]
impl Provider for ListingSearchProvider {
    fn name(&self) -> &str {
        "buscar_propiedades"
    }

    fn description(&self) -> &str {
        "Busca propiedades y bienes adjudicados en el catálogo. \
         Entiende texto libre con filtros de provincia, tipo de propiedad, \
         palabras clave y precio máximo."
    }

    async fn execute(&self, request: &ProviderRequest) -> anyhow::Result<ProviderReply> {
        let Some(search_request) = SearchRequest::build(&request.query, self.limit) else {
            // No safe criteria: refuse to scan the catalog, return nothing.
            // Stored results stay untouched since no search actually ran.
            info!(query = %request.query, "search refused: no usable criteria");
            return Ok(ProviderReply::stateful(NO_CRITERIA_TEXT));
        };

        let results = self.search.execute(&search_request).await?;
        info!(count = results.len(), "listing search executed");

        self.store
            .get_or_create(&request.session_id)
            .update_search_results(results.clone());

        if results.is_empty() {
            return Ok(ProviderReply::stateful(NO_RESULTS_TEXT));
        }
        Ok(ProviderReply::stateful(Self::render(&results)))
    }
}
