//! Pantry API Server
//!
//! HTTP API for ingredient reconciliation, receipt post-processing and
//! recipe search.

mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use pantry_core::CanonicalDictionary;
use pantry_embedding::{DisabledEmbedder, Embedder, EmbeddingClient, EmbeddingConfig};
use pantry_recipes::{RecipeClientConfig, RecipeSearchClient};
use pantry_services::{IngredientIndex, ReconcileConfig, Reconciler, RecipeService};
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const DEFAULT_DICTIONARY_PATH: &str = "data/materials_dict.json";
const DEFAULT_PORT: u16 = 3000;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dictionary: Arc<CanonicalDictionary>,
    pub embedder: Arc<dyn Embedder>,
    pub reconciler: Arc<Reconciler>,
    /// Embedding-indexed dictionary for recipe ingredient resolution
    pub index: Arc<IngredientIndex>,
    pub recipe_service: Arc<RecipeService>,
}

/// Build the HTTP application around a prepared state
pub fn app(state: AppState) -> Router {
    // Configure CORS for frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .nest("/api", routes::api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn build_embedder() -> anyhow::Result<Arc<dyn Embedder>> {
    match EmbeddingConfig::from_env() {
        Some(config) => {
            info!(
                "Embedding service configured at {} (timeout {:?}, batch {})",
                config.base_url, config.timeout, config.max_batch_size
            );
            Ok(Arc::new(EmbeddingClient::new(config)?))
        }
        None => {
            info!("EMBEDDING_URL not set - reconciliation will use string matching only");
            Ok(Arc::new(DisabledEmbedder))
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env.local file
    if let Err(e) = dotenvy::from_filename(".env.local") {
        // Not an error if the file doesn't exist
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env.local: {}", e);
        }
    }

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,pantry_api=debug")),
        )
        .init();

    info!("Starting Pantry API");

    let dictionary_path =
        std::env::var("DICTIONARY_PATH").unwrap_or_else(|_| DEFAULT_DICTIONARY_PATH.to_string());
    let dictionary = Arc::new(CanonicalDictionary::load(&dictionary_path)?);

    let embedder = build_embedder()?;
    if !embedder.is_available().await {
        warn!("Embedding service not reachable at startup; falling back per request");
    }

    let reconcile_config = ReconcileConfig::from_env();
    info!(
        "Similarity threshold {}, fuzzy cutoff {:?}",
        reconcile_config.similarity_threshold, reconcile_config.max_fuzzy_score
    );

    let reconciler = Arc::new(Reconciler::new(
        embedder.clone(),
        dictionary.clone(),
        reconcile_config,
    ));

    // Dictionary embeddings are computed once; a failure leaves string tiers only
    let index = Arc::new(IngredientIndex::build(dictionary.clone(), embedder.as_ref()).await);

    let recipe_client = RecipeSearchClient::new(RecipeClientConfig::from_env())?;
    info!("Recipe crawler targeting {}", recipe_client.base_url());
    let recipe_service = Arc::new(RecipeService::new(recipe_client, reconciler.clone()));

    let state = AppState {
        dictionary,
        embedder,
        reconciler,
        index,
        recipe_service,
    };

    // Start server
    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}
