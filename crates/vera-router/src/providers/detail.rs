use std::sync::Arc;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::{info, warn};
use vera_core::domain::host_allowed;
use vera_core::Listing;
use vera_session::SessionContextStore;

use crate::provider::{Provider, ProviderReply, ProviderRequest};
use crate::traits::{Completion, ListingLookup, WebFetch};

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("url pattern"));

/// Truncate at a char boundary at or below `max` bytes.
fn truncate_at(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Page text shorter than this is treated as an empty fetch.
const MIN_PAGE_TEXT: usize = 50;
/// Page text is truncated before prompting.
const MAX_PAGE_TEXT: usize = 2500;

/// Hybrid detail lookup: catalog record + live page text, merged into one
/// prose answer. Only URLs of the allow-listed listings domain are accepted.
pub struct PropertyDetailProvider {
    lookup: Arc<dyn ListingLookup>,
    web: Arc<dyn WebFetch>,
    completion: Arc<dyn Completion>,
    store: Arc<SessionContextStore>,
    allowed_domain: String,
}

impl PropertyDetailProvider {
    pub fn new(
        lookup: Arc<dyn ListingLookup>,
        web: Arc<dyn WebFetch>,
        completion: Arc<dyn Completion>,
        store: Arc<SessionContextStore>,
        allowed_domain: impl Into<String>,
    ) -> Self {
        Self {
            lookup,
            web,
            completion,
            store,
            allowed_domain: allowed_domain.into(),
        }
    }

    fn hybrid_prompt(web_content: &str, catalog_block: &str, url: &str, query: &str) -> String {
        format!(
            "Eres VERA, una asistente experta en bienes raíces en Costa Rica.\n\
             Tienes dos fuentes sobre una propiedad.\n\n\
             CONTENIDO DE LA PÁGINA WEB:\n{web_content}\n\n\
             DATOS DEL CATÁLOGO:\n{catalog_block}\n\n\
             URL DE LA PROPIEDAD: {url}\n\n\
             CONSULTA DEL USUARIO:\n{query}\n\n\
             Combina ambas fuentes. Los datos del catálogo mandan para precio, \
             banco/entidad y agente a cargo; menciona banco y agente siempre que \
             existan. Si falta información, dilo y sugiere contactar al agente. \
             Cierra siempre con: 🔗 **Ver propiedad completa:** {url}\n\n\
             RESPUESTA:"
        )
    }

    fn fallback_answer(web_content: &str, catalog_block: &str, url: &str) -> String {
        let page = truncate_at(web_content, 1000);
        format!(
            "## 🏠 Información de la Propiedad\n\n\
             ### Datos del catálogo:\n{catalog_block}\n\n\
             ### Información de la página web:\n{page}\n\n---\n\n\
             🔗 **Ver propiedad completa:** {url}"
        )
    }
}

#[async_trait]
impl Provider for PropertyDetailProvider {
    fn name(&self) -> &str {
        "detalle_propiedad"
    }

    fn description(&self) -> &str {
        "Da información detallada de una propiedad específica a partir de su \
         enlace en el sitio de bienes adjudicados. Usar cuando el mensaje \
         incluye una URL de propiedad o pide el análisis completo de una."
    }

    async fn execute(&self, request: &ProviderRequest) -> anyhow::Result<ProviderReply> {
        let urls: Vec<&str> = URL_RE
            .find_iter(&request.query)
            .map(|m| m.as_str().trim_end_matches([',', '.', ';']))
            .collect();

        let Some(url) = urls
            .iter()
            .copied()
            .find(|u| host_allowed(u, &self.allowed_domain))
        else {
            if urls.is_empty() {
                return Ok(ProviderReply::conversational(
                    "Necesito el enlace de la propiedad para darte más detalles. \
                     ¿Puedes pegarlo aquí?",
                ));
            }
            warn!(?urls, "rejected foreign urls");
            return Ok(ProviderReply::conversational(format!(
                "Solo puedo consultar enlaces de **{}**. \
                 Por favor proporciona un enlace de ese sitio.",
                self.allowed_domain
            )));
        };

        info!(url, "property detail lookup");

        // A catalog miss is tolerable; the page may still answer the query.
        let record: Option<Listing> = match self.lookup.by_url(url).await {
            Ok(record) => record,
            Err(err) => {
                warn!(error = %err, url, "catalog lookup failed, continuing with web only");
                None
            }
        };

        let page_text = match self.web.retrieve(url).await {
            Ok(text) if text.trim().len() >= MIN_PAGE_TEXT => text,
            Ok(_) if record.is_some() => {
                "La página web no proporcionó información detallada.".to_string()
            }
            Ok(_) => {
                return Ok(ProviderReply::conversational(format!(
                    "No pude obtener información suficiente de {url}. \
                     Por favor verifica el enlace o intenta más tarde."
                )));
            }
            Err(err) if record.is_some() => {
                warn!(error = %err, url, "web fetch failed, answering from catalog only");
                "La página web no proporcionó información detallada.".to_string()
            }
            Err(err) => return Err(err),
        };

        let page_text = if page_text.len() > MAX_PAGE_TEXT {
            format!("{}\n\n[... contenido truncado ...]", truncate_at(&page_text, MAX_PAGE_TEXT))
        } else {
            page_text
        };

        let catalog_block = record
            .as_ref()
            .map(Listing::detail_block)
            .unwrap_or_else(|| "No se encontraron datos en el catálogo para esta URL.".into());

        let prompt = Self::hybrid_prompt(&page_text, &catalog_block, url, &request.query);
        let answer = match self.completion.generate(&prompt).await {
            Ok(text) => text.trim().to_string(),
            Err(err) => {
                warn!(error = %err, "completion failed, using fallback formatting");
                Self::fallback_answer(&page_text, &catalog_block, url)
            }
        };

        if let Some(listing) = record {
            self.store
                .get_or_create(&request.session_id)
                .update_last_property(listing);
        }

        Ok(ProviderReply::stateful(answer))
    }
}
