//! Receipt extraction post-processing endpoint

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use chrono::{Local, NaiveDate};
use pantry_services::{parse_extraction, reconcile_receipt, ReceiptLine};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::error_response;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/receipts/normalize", post(normalize_receipt))
}

#[derive(Debug, Deserialize)]
struct ReceiptRequest {
    /// Raw model output (string) or an already-parsed JSON object
    extraction: Value,
    /// Reference date for expiry computation; defaults to today
    #[serde(default)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct ReceiptResponse {
    items: Vec<ReceiptLine>,
}

async fn normalize_receipt(
    State(state): State<AppState>,
    Json(req): Json<ReceiptRequest>,
) -> Response {
    let raw = match req.extraction {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    };
    let today = req.today.unwrap_or_else(|| Local::now().date_naive());

    let entries = match parse_extraction(&raw, today) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Rejected receipt extraction: {}", e);
            return error_response(StatusCode::BAD_REQUEST, e.to_string());
        }
    };

    let items = reconcile_receipt(entries, &state.reconciler);
    info!("Normalized {} receipt items", items.len());

    Json(ReceiptResponse { items }).into_response()
}
