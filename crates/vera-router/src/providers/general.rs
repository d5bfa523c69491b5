use std::sync::Arc;

use async_trait::async_trait;

use crate::provider::{Provider, ProviderReply, ProviderRequest};
use crate::traits::Completion;

/// Persona small talk and generic questions, no backend data involved.
pub struct GeneralChatProvider {
    completion: Arc<dyn Completion>,
}

impl GeneralChatProvider {
    pub fn new(completion: Arc<dyn Completion>) -> Self {
        Self { completion }
    }

    fn prompt(request: &ProviderRequest) -> String {
        let mut prompt = String::from(
            "Eres VERA, una asistente útil y breve de bienes raíces.\n\
             Si el usuario saluda, saluda y pregunta qué necesita.\n\
             Si pide algo general, responde directo.\n\
             Si pide datos específicos de propiedades o del negocio, pídele que lo especifique.\n",
        );
        if let Some(name) = &request.display_name {
            prompt.push_str(&format!("El nombre del usuario es: {name}.\n"));
        }
        if !request.history.is_empty() {
            prompt.push('\n');
            for turn in &request.history {
                prompt.push_str(&turn.transcript_line());
                prompt.push('\n');
            }
        }
        prompt.push_str(&format!("\nUsuario: {}\nRespuesta:", request.query));
        prompt
    }
}

#[async_trait]
impl Provider for GeneralChatProvider {
    fn name(&self) -> &str {
        "conversacion_general"
    }

    fn description(&self) -> &str {
        "Conversación general: saludos, agradecimientos, dudas sobre el \
         servicio y cualquier pregunta que no requiera datos del catálogo \
         ni de la base del negocio."
    }

    async fn execute(&self, request: &ProviderRequest) -> anyhow::Result<ProviderReply> {
        let text = self.completion.generate(&Self::prompt(request)).await?;
        Ok(ProviderReply::conversational(text.trim().to_string()))
    }
}
