//! External collaborator seams consumed by the routing core.
//!
//! The core never depends on collaborator internals; production
//! implementations live in `vera-backends`, tests substitute mocks.

use async_trait::async_trait;
use vera_core::Listing;
use vera_filter::SearchRequest;

use crate::provider::ProviderCard;

/// Single-choice intent classifier. Must return one of the supplied card
/// names or fail; the router validates the answer either way.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn select(&self, message: &str, choices: &[ProviderCard]) -> anyhow::Result<String>;
}

/// Prose generation for non-structured providers.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

/// Parameterized structured search over the listings catalog. The `limit`
/// inside the request is a hard cap the backend must honor.
#[async_trait]
pub trait ListingSearch: Send + Sync {
    async fn execute(&self, request: &SearchRequest) -> anyhow::Result<Vec<Listing>>;
}

/// Point lookups for single catalog records.
#[async_trait]
pub trait ListingLookup: Send + Sync {
    async fn by_url(&self, url: &str) -> anyhow::Result<Option<Listing>>;
    async fn by_name(&self, name: &str) -> anyhow::Result<Option<Listing>>;
}

/// Page-content retrieval, restricted to the allow-listed listings domain.
#[async_trait]
pub trait WebFetch: Send + Sync {
    async fn retrieve(&self, url: &str) -> anyhow::Result<String>;
}

/// Natural-language questions against the general business database,
/// answered by an external structured-query engine.
#[async_trait]
pub trait BusinessQuery: Send + Sync {
    async fn answer(&self, question: &str) -> anyhow::Result<String>;
}
