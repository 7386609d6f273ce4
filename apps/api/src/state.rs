use std::sync::Arc;

use mongodb::Database;

use crate::llm_client::CompletionClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    /// Pluggable completion backend. HTTP client in production; tests swap
    /// in a canned transcript.
    pub llm: Arc<dyn CompletionClient>,
}
