use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vera_core::Listing;

/// What one session remembers about previous results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationState {
    /// Last search results, in relevance/recency order.
    pub last_listings: Vec<Listing>,
    /// Set iff the last search produced exactly one listing.
    pub last_selected_id: Option<i64>,
    /// Snapshot of the last individually-shown property.
    pub last_property: Option<Listing>,
    pub updated_at: DateTime<Utc>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self {
            last_listings: Vec::new(),
            last_selected_id: None,
            last_property: None,
            updated_at: Utc::now(),
        }
    }

    /// Store search results and recompute the selection invariant.
    pub fn set_search_results(&mut self, listings: Vec<Listing>) {
        self.last_selected_id = match listings.as_slice() {
            [only] => Some(only.id),
            _ => None,
        };
        self.last_listings = listings;
        self.touch();
    }

    pub fn set_last_property(&mut self, listing: Listing) {
        self.last_property = Some(listing);
        self.touch();
    }

    /// Source URLs of the stored results, in stored order.
    pub fn listing_urls(&self) -> Vec<String> {
        self.last_listings
            .iter()
            .filter_map(|l| l.source_url.clone())
            .collect()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for ConversationState {
    fn default() -> Self {
        Self::new()
    }
}
