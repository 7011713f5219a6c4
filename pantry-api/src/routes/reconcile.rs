//! Have/need reconciliation endpoints

use axum::{extract::State, routing::post, Json, Router};
use pantry_core::{Classification, RawIngredientMention, ReconciliationReport};
use serde::Deserialize;
use tracing::debug;

use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reconcile/classify", post(classify))
        .route("/reconcile/mentions", post(reconcile_mentions))
}

#[derive(Debug, Deserialize)]
struct ClassifyRequest {
    #[serde(default)]
    ingredients: Vec<String>,
    #[serde(default)]
    grocery: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MentionsRequest {
    #[serde(default)]
    mentions: Vec<RawIngredientMention>,
    #[serde(default)]
    grocery: Vec<String>,
}

async fn classify(
    State(state): State<AppState>,
    Json(req): Json<ClassifyRequest>,
) -> Json<Classification> {
    let classification = state.reconciler.classify(&req.ingredients, &req.grocery).await;
    debug!(
        "Classified {} have / {} need ({})",
        classification.have.len(),
        classification.need.len(),
        classification.mode
    );
    Json(classification)
}

async fn reconcile_mentions(
    State(state): State<AppState>,
    Json(req): Json<MentionsRequest>,
) -> Json<ReconciliationReport> {
    Json(
        state
            .reconciler
            .reconcile_mentions(&req.mentions, &req.grocery)
            .await,
    )
}
