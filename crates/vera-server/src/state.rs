//! Application state shared across all handlers.

use std::sync::Arc;
use vera_router::Assistant;

#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<Assistant>,
}

impl AppState {
    pub fn new(assistant: Assistant) -> Self {
        Self { assistant: Arc::new(assistant) }
    }
}
