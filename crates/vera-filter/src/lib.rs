//! Free-text-to-structured-filter extraction for listings search.
//!
//! Turns a sentence into bounded, parameterized criteria: a region from a
//! fixed whitelist, an integer price ceiling, and the leftover search terms.
//! Callers must refuse to run a query when nothing usable was extracted.

pub mod price;
pub mod regions;
pub mod stopwords;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use price::detect_price_ceiling;
pub use regions::detect_region;
pub use stopwords::is_stop_word;

/// Tokens shorter than this carry no search signal.
pub const MIN_TOKEN_LEN: usize = 3;
/// Hard cap on rows any structured search may return.
pub const MAX_ROWS: u32 = 50;

/// Structured criteria extracted from free text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSet {
    pub region: Option<String>,
    pub price_ceiling: Option<i64>,
}

impl FilterSet {
    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.price_ceiling.is_none()
    }
}

/// Extract the structured filters from free text.
pub fn extract(text: &str) -> FilterSet {
    let filters = FilterSet {
        region: detect_region(text),
        price_ceiling: detect_price_ceiling(text),
    };
    debug!(?filters, "extracted filters");
    filters
}

/// Lowercased non-stop-word tokens of at least [`MIN_TOKEN_LEN`] characters,
/// in input order. Punctuation at token edges is trimmed first.
pub fn search_terms(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| {
            raw.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|token| token.chars().count() >= MIN_TOKEN_LEN && !is_stop_word(token))
        .collect()
}

/// A bounded search request: filters, leftover terms, and a clamped row cap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub filters: FilterSet,
    pub terms: Vec<String>,
    pub limit: u32,
}

impl SearchRequest {
    /// Build a request from free text, or `None` when the text yields no
    /// safe criteria at all (policy: never run an unbounded catalog scan).
    pub fn build(text: &str, limit: u32) -> Option<Self> {
        let filters = extract(text);
        let terms = search_terms(text);
        if filters.is_empty() && terms.is_empty() {
            debug!(text, "no usable search criteria");
            return None;
        }
        Some(Self {
            filters,
            terms,
            limit: limit.clamp(1, MAX_ROWS),
        })
    }
}
