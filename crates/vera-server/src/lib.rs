//! VERA HTTP API server (Axum).
//!
//! Thin transport over the conversational engine: chat, greeting, memory
//! wipe, and health monitoring.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;

/// Build the application router with the given state.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::api_routes())
        .with_state(state)
}

#[cfg(test)]
mod tests;
