use std::sync::Arc;
use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use tracing::info;
use vera_core::listing::format_thousands;
use vera_core::Listing;

use crate::provider::{Provider, ProviderReply, ProviderRequest};
use crate::traits::ListingLookup;

/// Which attribute a question is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttributeKind {
    Bank,
    Agent,
    Price,
    Bedrooms,
    Bathrooms,
    Location,
    Area,
    Type,
}

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https?://\S+").expect("url pattern"));

// First the exact shape the resolver's expansion produces, then a looser
// "de/del/sobre <nombre>" capture for hand-typed questions.
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:de|del|sobre)\s+la\s+propiedad\s+['"]?([^'"?(]+)"#).expect("name pattern")
});
static BARE_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:del|sobre)\s+['"]?([^'"?(]{4,})"#).expect("bare name pattern")
});

static KIND_PATTERNS: LazyLock<Vec<(Regex, AttributeKind)>> = LazyLock::new(|| {
    [
        (r"\b(?:banco|entidad|financiera)\b", AttributeKind::Bank),
        (
            r"\b(?:agente|asesor|encargado|contacto|representante|dueño|dueno|propietario|vendedor)\b",
            AttributeKind::Agent,
        ),
        (r"\b(?:precio|costo|cuanto\s+cuesta|cuánto\s+cuesta|valor)\b", AttributeKind::Price),
        (
            r"\b(?:habitacion(?:es)?|habitación|cuartos?|dormitorios?)\b",
            AttributeKind::Bedrooms,
        ),
        (r"\b(?:baños?|banos?)\b", AttributeKind::Bathrooms),
        (
            r"\b(?:ubicacion|ubicación|ubicada|direccion|dirección|donde|dónde|queda)\b",
            AttributeKind::Location,
        ),
        (r"\b(?:area|área|tamaño|tamano|metros|m2)\b", AttributeKind::Area),
        (r"\b(?:tipo|categoria|categoría|clase)\b", AttributeKind::Type),
    ]
    .iter()
    .map(|(p, k)| (Regex::new(p).expect("attribute kind pattern"), *k))
    .collect()
});

fn detect_kind(query: &str) -> Option<AttributeKind> {
    let lowered = query.to_lowercase();
    KIND_PATTERNS
        .iter()
        .find(|(re, _)| re.is_match(&lowered))
        .map(|(_, kind)| *kind)
}

/// Answers attribute questions about one property straight from the catalog,
/// without touching the web.
pub struct PropertyQuestionProvider {
    lookup: Arc<dyn ListingLookup>,
}

impl PropertyQuestionProvider {
    pub fn new(lookup: Arc<dyn ListingLookup>) -> Self {
        Self { lookup }
    }

    async fn find_listing(&self, query: &str) -> anyhow::Result<Option<Listing>> {
        if let Some(url) = URL_RE.find(query) {
            let url = url.as_str().trim_end_matches([')', ',', '.', ';']);
            return self.lookup.by_url(url).await;
        }
        for re in [&*NAME_RE, &*BARE_NAME_RE] {
            if let Some(captures) = re.captures(query) {
                let name = captures[1].trim().trim_end_matches('.');
                if !name.is_empty() {
                    return self.lookup.by_name(name).await;
                }
            }
        }
        Ok(None)
    }

    fn answer(kind: AttributeKind, listing: &Listing) -> String {
        let name = &listing.name;
        match kind {
            AttributeKind::Bank => match &listing.bank_name {
                Some(bank) => format!(
                    "**{name}** pertenece a **{bank}**.\n\n\
                     Para más información sobre el proceso de adquisición, te \
                     recomiendo contactar directamente con el banco o el agente a cargo."
                ),
                None => format!("No tengo información del banco para **{name}** en nuestros registros."),
            },
            AttributeKind::Agent => match &listing.agent_name {
                Some(agent) => {
                    let phone = listing
                        .agent_phone
                        .as_deref()
                        .map(|p| format!(" 📞 **{p}**"))
                        .unwrap_or_default();
                    format!(
                        "El agente a cargo de **{name}** es **{agent}**{phone}.\n\n\
                         ¿Necesitas que te ayude con algo más sobre esta propiedad?"
                    )
                }
                None => format!("No tengo información del agente para **{name}** en nuestros registros."),
            },
            AttributeKind::Price => match listing.price_usd {
                Some(price) => format!(
                    "El precio de **{name}** es **USD {}**.\n\n\
                     Este precio puede estar sujeto a negociación dependiendo del \
                     banco o entidad. ¿Te gustaría conocer más detalles?",
                    format_thousands(price)
                ),
                None => format!(
                    "El precio de **{name}** no está disponible en nuestros registros. \
                     Te recomiendo contactar al agente directamente."
                ),
            },
            AttributeKind::Bedrooms => match listing.bedrooms {
                Some(rooms) => format!("**{name}** tiene **{rooms} habitaciones**."),
                None => format!("No tengo el número de habitaciones de **{name}**."),
            },
            AttributeKind::Bathrooms => match listing.bathrooms {
                Some(baths) => format!("**{name}** tiene **{baths} baños**."),
                None => format!("No tengo el número de baños de **{name}**."),
            },
            AttributeKind::Location => {
                let location = listing.location();
                if location.is_empty() {
                    format!("No tengo la ubicación detallada de **{name}**.")
                } else {
                    format!(
                        "**{name}** está ubicada en **{location}**.\n\n\
                         ¿Te gustaría conocer más detalles sobre la zona o la propiedad?"
                    )
                }
            }
            AttributeKind::Area => {
                let mut parts = Vec::new();
                if let Some(area) = listing.built_area_m2 {
                    parts.push(format!("• Área de construcción: **{area} m²**"));
                }
                if let Some(area) = listing.lot_area_m2 {
                    parts.push(format!("• Tamaño del lote: **{area} m²**"));
                }
                if parts.is_empty() {
                    format!("No tengo información sobre las áreas de **{name}**.")
                } else {
                    format!("**{name}**:\n{}", parts.join("\n"))
                }
            }
            AttributeKind::Type => match &listing.property_type {
                Some(kind) => format!("**{name}** es un/a **{kind}**."),
                None => format!("No tengo el tipo de **{name}**."),
            },
        }
    }
}

#[async_trait]
impl Provider for PropertyQuestionProvider {
    fn name(&self) -> &str {
        "consulta_propiedad"
    }

    fn description(&self) -> &str {
        "Responde preguntas puntuales sobre una propiedad ya identificada: \
         banco o entidad dueña, agente de contacto, precio, habitaciones, \
         baños, ubicación, áreas o tipo."
    }

    async fn execute(&self, request: &ProviderRequest) -> anyhow::Result<ProviderReply> {
        let Some(kind) = detect_kind(&request.query) else {
            return Ok(ProviderReply::conversational(
                "No estoy segura de qué información necesitas sobre la propiedad. \
                 ¿Podrías ser más específico?",
            ));
        };
        info!(?kind, "property attribute question");

        let Some(listing) = self.find_listing(&request.query).await? else {
            return Ok(ProviderReply::conversational(
                "No encontré información de esa propiedad en nuestros registros. \
                 ¿Podrías proporcionar el enlace de la propiedad o más detalles?",
            ));
        };

        Ok(ProviderReply::conversational(Self::answer(kind, &listing)))
    }
}
