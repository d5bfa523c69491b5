//! Contextual attribute questions about the last shown property.

use std::sync::LazyLock;

use regex::Regex;
use tracing::info;
use vera_core::Listing;

static ATTRIBUTE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "a qué banco pertenece", "de cuál banco es"
        r"\b(?:a|de)\s+(?:que|qué|cual|cuál)\s+banco\b",
        r"\b(?:quien|quién)\s+(?:es\s+el\s+)?(?:dueño|dueno|propietario|vendedor|agente)\b",
        r"\b(?:cual|cuál)\s+es\s+(?:el|la)\s+(?:precio|ubicación|ubicacion|dirección|direccion)\b",
        // "tiene garage", "incluye cochera"
        r"\b(?:tiene|incluye)\s+\w+",
        r"\b(?:cuantos|cuántos|cuantas|cuántas)\s+(?:cuartos|habitaciones|baños|banos)\b",
        r"\b(?:donde|dónde)\s+(?:esta|está|queda)\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("attribute pattern"))
    .collect()
});

/// Is this a question about an attribute of "it" / the current property?
pub fn is_attribute_question(message: &str) -> bool {
    let lowered = message.to_lowercase();
    ATTRIBUTE_PATTERNS.iter().any(|re| re.is_match(&lowered))
}

/// Expand an attribute question with an explicit reference to the last shown
/// property. Returns `None` (and logs the miss) when there is no property to
/// anchor the question to.
pub fn expand(message: &str, last_property: Option<&Listing>) -> Option<String> {
    if !is_attribute_question(message) {
        return None;
    }
    let Some(property) = last_property else {
        info!(message, "contextual question without a previous property");
        return None;
    };

    let expanded = match property.source_url.as_deref() {
        Some(url) => format!("{message} de la propiedad '{}' ({url})", property.name),
        None => format!("{message} de la propiedad '{}'", property.name),
    };
    Some(expanded)
}
