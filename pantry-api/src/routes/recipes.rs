//! Recipe search, detail and recommendation endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use pantry_services::{recommend, RecipeCandidate, RecipeMatch, Recommendation};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::error_response;
use crate::AppState;

const DEFAULT_SEARCH_LIMIT: usize = 5;
const MAX_SEARCH_LIMIT: usize = 20;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/search", post(search))
        .route("/recipes/detail", post(detail))
        .route("/recipes/recommend", post(recommend_recipes))
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    #[serde(default)]
    ingredients: Vec<String>,
    /// User inventory to classify against
    #[serde(default)]
    grocery: Vec<String>,
    #[serde(default)]
    limit: Option<usize>,
}

#[derive(Debug, Serialize)]
struct SearchResponse {
    recipes: Vec<RecipeMatch>,
}

#[derive(Debug, Deserialize)]
struct DetailRequest {
    #[serde(default)]
    url: String,
}

#[derive(Debug, Deserialize)]
struct RecommendRequest {
    #[serde(default)]
    recipes: Vec<RecipeCandidate>,
    #[serde(default)]
    inventory: Vec<String>,
}

#[derive(Debug, Serialize)]
struct RecommendResponse {
    recommendations: Vec<Recommendation>,
}

async fn search(State(state): State<AppState>, Json(req): Json<SearchRequest>) -> Response {
    let ingredients: Vec<String> = req
        .ingredients
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if ingredients.is_empty() {
        return error_response(
            StatusCode::BAD_REQUEST,
            "At least one ingredient is required",
        );
    }

    let limit = req
        .limit
        .unwrap_or(DEFAULT_SEARCH_LIMIT)
        .clamp(1, MAX_SEARCH_LIMIT);
    info!("Recipe search for {:?} (limit {})", ingredients, limit);

    match state
        .recipe_service
        .search(&ingredients, &req.grocery, limit)
        .await
    {
        Ok(recipes) => Json(SearchResponse { recipes }).into_response(),
        Err(e) => {
            error!("Recipe search failed: {}", e);
            error_response(StatusCode::BAD_GATEWAY, format!("Recipe search failed: {}", e))
        }
    }
}

async fn detail(State(state): State<AppState>, Json(req): Json<DetailRequest>) -> Response {
    let url = req.url.trim();
    if url.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "url is required");
    }

    match state.recipe_service.detail(url).await {
        Ok(detail) => Json(detail).into_response(),
        Err(e) => {
            error!("Recipe detail failed for {}: {}", url, e);
            error_response(
                StatusCode::BAD_GATEWAY,
                format!("Failed to fetch recipe detail: {}", e),
            )
        }
    }
}

async fn recommend_recipes(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Json<RecommendResponse> {
    let recommendations = recommend(&state.reconciler, req.recipes, &req.inventory).await;
    Json(RecommendResponse { recommendations })
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::routes::test_support::{app, post_json};

    #[tokio::test]
    async fn test_search_requires_ingredients() {
        let (status, body) = post_json(
            app().await,
            "/api/recipes/search",
            json!({ "ingredients": ["  "], "grocery": ["감자"] }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_search_reports_unreachable_site() {
        let (status, _) = post_json(
            app().await,
            "/api/recipes/search",
            json!({ "ingredients": ["감자"] }),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_detail_requires_url() {
        let (status, _) = post_json(app().await, "/api/recipes/detail", json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_recommend_ranks_by_coverage() {
        let (status, body) = post_json(
            app().await,
            "/api/recipes/recommend",
            json!({
                "recipes": [
                    { "title": "카레", "ingredients": ["감자", "당근", "양파", "카레가루"] },
                    { "title": "감자전", "ingredients": ["감자", "소금"] }
                ],
                "inventory": ["감자", "소금"]
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let recs = body["recommendations"].as_array().unwrap();
        assert_eq!(recs[0]["title"], "감자전");
        assert_eq!(recs[0]["match_score"], 1.0);
        assert_eq!(recs[1]["need"], json!(["당근", "양파", "카레가루"]));
    }

    #[tokio::test]
    async fn test_recommend_with_empty_inventory() {
        let (_, body) = post_json(
            app().await,
            "/api/recipes/recommend",
            json!({ "recipes": [{ "title": "감자전", "ingredients": ["감자"] }], "inventory": [] }),
        )
        .await;

        assert_eq!(body["recommendations"], json!([]));
    }
}
