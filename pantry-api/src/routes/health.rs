//! Health check endpoints

use axum::{extract::State, response::Json, routing::get, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    /// Whether the embedding service answers right now
    embeddings_available: bool,
    /// Whether dictionary embeddings were indexed at startup
    index_embeddings: bool,
    dictionary_size: usize,
}

/// Health check handler
///
/// An unreachable embedding service only degrades matching quality, so
/// the server still answers 200.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let embeddings_available = state.embedder.is_available().await;

    Json(HealthResponse {
        status: if embeddings_available {
            "healthy"
        } else {
            "degraded"
        },
        embeddings_available,
        index_embeddings: state.index.has_embeddings(),
        dictionary_size: state.dictionary.len(),
    })
}

/// Simple liveness check (always returns OK if server is running)
async fn liveness() -> &'static str {
    "OK"
}

/// Create health routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/health/live", get(liveness))
}
