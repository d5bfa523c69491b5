//! Shared types, configuration, and errors for the VERA assistant.

pub mod config;
pub mod domain;
pub mod error;
pub mod listing;
pub mod turn;

pub use config::VeraConfig;
pub use error::{Result, VeraError};
pub use listing::Listing;
pub use turn::{Role, Turn};

#[cfg(test)]
mod tests;
