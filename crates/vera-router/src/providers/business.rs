use std::sync::Arc;

use async_trait::async_trait;

use crate::provider::{Provider, ProviderReply, ProviderRequest};
use crate::traits::BusinessQuery;

/// Structured questions against the general business database, delegated to
/// the external query engine.
pub struct BusinessQueryProvider {
    backend: Arc<dyn BusinessQuery>,
}

impl BusinessQueryProvider {
    pub fn new(backend: Arc<dyn BusinessQuery>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Provider for BusinessQueryProvider {
    fn name(&self) -> &str {
        "base_negocio"
    }

    fn description(&self) -> &str {
        "Usar para preguntas sobre datos estructurados del negocio: \
         usuarios, ventas, inventario, facturas, operaciones internas y reportes."
    }

    async fn execute(&self, request: &ProviderRequest) -> anyhow::Result<ProviderReply> {
        let answer = self.backend.answer(&request.query).await?;
        Ok(ProviderReply::conversational(answer))
    }
}
