//! Rewrites ambiguous follow-up messages into self-contained queries.
//!
//! Two independent rewrites, both driven by stored session context:
//!
//! 1. Detail requests ("dime más de la segunda", "info de #3") resolve an
//!    ordinal against listing URLs the assistant has already shown and become
//!    an explicit fetch-details instruction.
//! 2. Attribute questions ("¿a qué banco pertenece?") are expanded with the
//!    name and URL of the last shown property.
//!
//! Resolution never fails: missing context degrades to pass-through.

pub mod attribute;
pub mod detail;

use regex::Regex;
use tracing::debug;
use vera_core::Turn;
use vera_session::ConversationState;

/// Which rewrite, if any, was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionKind {
    Unchanged,
    DetailRewrite,
    AttributeExpansion,
}

/// The resolver's output: the (possibly rewritten) message plus what happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub text: String,
    pub kind: ResolutionKind,
}

impl Resolution {
    pub fn rewritten(&self) -> bool {
        self.kind != ResolutionKind::Unchanged
    }
}

pub struct ReferenceResolver {
    url_re: Regex,
}

impl ReferenceResolver {
    /// `listings_domain` scopes which URLs count as listing references.
    pub fn new(listings_domain: &str) -> Self {
        let pattern = format!(
            r"(?i)https?://(?:[a-z0-9-]+\.)*{}/propiedades/[^\s)\]]+",
            regex::escape(listings_domain)
        );
        Self {
            url_re: Regex::new(&pattern).expect("listing url pattern"),
        }
    }

    /// Resolve one message against the session's state and recent transcript.
    ///
    /// Pure with respect to the session: calling it twice with unchanged
    /// state yields the same resolution.
    pub fn resolve(&self, message: &str, state: &ConversationState, window: &[Turn]) -> Resolution {
        if detail::is_detail_request(message) {
            // Prefer URLs the assistant actually wrote; stateful search
            // results never reach the transcript, so fall back to the
            // stored listings in that case.
            let mut urls = detail::extract_listing_urls(window, &self.url_re);
            if urls.is_empty() {
                urls = state.listing_urls();
            }
            let reference = detail::reference_index(message);
            if let Some(url) = detail::select_url(&urls, reference) {
                let text = detail::detail_instruction(url);
                debug!(original = message, rewritten = %text, "detail rewrite");
                return Resolution { text, kind: ResolutionKind::DetailRewrite };
            }
        }

        if let Some(text) = attribute::expand(message, state.last_property.as_ref()) {
            debug!(original = message, rewritten = %text, "attribute expansion");
            return Resolution { text, kind: ResolutionKind::AttributeExpansion };
        }

        Resolution { text: message.to_string(), kind: ResolutionKind::Unchanged }
    }
}

#[cfg(test)]
mod tests;
