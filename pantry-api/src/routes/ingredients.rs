//! Ingredient resolution endpoints

use axum::{extract::State, routing::post, Json, Router};
use pantry_core::MatchResult;
use serde::{Deserialize, Serialize};

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ingredients/resolve", post(resolve))
        .route("/ingredients/normalize", post(normalize))
}

#[derive(Debug, Deserialize)]
struct NameRequest {
    name: String,
}

#[derive(Debug, Serialize)]
struct MatchResponse {
    #[serde(rename = "match")]
    matched: Option<MatchResult>,
}

/// Map a free-text name onto the dictionary with the tiered fuzzy matcher
async fn resolve(State(state): State<AppState>, Json(req): Json<NameRequest>) -> Json<MatchResponse> {
    Json(MatchResponse {
        matched: state.reconciler.resolve(&req.name),
    })
}

/// Resolve a recipe ingredient name: exact, substring, then embedding
async fn normalize(
    State(state): State<AppState>,
    Json(req): Json<NameRequest>,
) -> Json<MatchResponse> {
    Json(MatchResponse {
        matched: state.index.resolve(&req.name, state.embedder.as_ref()).await,
    })
}
