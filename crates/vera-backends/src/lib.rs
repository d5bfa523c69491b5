//! Production implementations of the routing core's collaborator seams.

pub mod business;
pub mod mysql;
pub mod openai;
pub mod webfetch;

pub use business::HttpBusinessQuery;
pub use mysql::MySqlListingStore;
pub use openai::OpenAiClient;
pub use webfetch::RestrictedWebFetch;
