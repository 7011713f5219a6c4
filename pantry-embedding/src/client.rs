//! HTTP client for the sentence-embedding service
//!
//! The service is a best-effort enrichment layer: every failure is reported
//! to the caller as "embeddings unavailable" and logged, never raised.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::{
    config::EmbeddingConfig,
    error::{EmbeddingError, Result},
    types::{EmbedRequest, EmbedResponse, EmbeddingVector, ServiceHealth},
};

/// Source of text embeddings
///
/// `None` means the embeddings are unavailable for this batch and the caller
/// must fall back to string matching. Empty input yields `Some(vec![])`.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Option<Vec<EmbeddingVector>>;

    /// Whether the backing service currently answers health checks
    async fn is_available(&self) -> bool;
}

/// Embedder used when no embedding service is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledEmbedder;

#[async_trait]
impl Embedder for DisabledEmbedder {
    async fn embed(&self, texts: &[String]) -> Option<Vec<EmbeddingVector>> {
        if texts.is_empty() {
            return Some(Vec::new());
        }
        None
    }

    async fn is_available(&self) -> bool {
        false
    }
}

/// Client for the `POST /embed` service
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    health_url: String,
    config: EmbeddingConfig,
}

impl EmbeddingClient {
    /// Create a new embedding client
    pub fn new(config: EmbeddingConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EmbeddingError::Config(format!("Failed to create HTTP client: {}", e)))?;

        let base = config.base_url.trim_end_matches('/').to_string();

        Ok(Self {
            client,
            endpoint: format!("{}/embed", base),
            health_url: format!("{}/", base),
            config,
        })
    }

    pub fn config(&self) -> &EmbeddingConfig {
        &self.config
    }

    /// Embed a batch of texts, surfacing the failure reason
    ///
    /// Batches above the service cap are sent as sequential chunks; any
    /// failing chunk fails the whole call. The configured timeout bounds the
    /// whole call, not each chunk.
    #[instrument(skip(self, texts), fields(count = texts.len()))]
    pub async fn try_embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let vectors = tokio::time::timeout(self.config.timeout, self.request_chunks(texts))
            .await
            .map_err(|_| EmbeddingError::Timeout(self.config.timeout.as_millis()))??;

        self.validate(&vectors)?;

        debug!(
            "Embedded {} texts (dimension={})",
            vectors.len(),
            vectors.first().map(Vec::len).unwrap_or(0)
        );

        Ok(vectors)
    }

    async fn request_chunks(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(self.config.max_batch_size.max(1)) {
            vectors.extend(self.request_batch(chunk).await?);
        }
        Ok(vectors)
    }

    async fn request_batch(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&EmbedRequest { texts })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EmbeddingError::Timeout(self.config.timeout.as_millis())
                } else {
                    EmbeddingError::Request(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::Status {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::Malformed(e.to_string()))?;

        if body.embeddings.len() != texts.len() {
            return Err(EmbeddingError::CountMismatch {
                expected: texts.len(),
                actual: body.embeddings.len(),
            });
        }

        Ok(body.embeddings)
    }

    /// All vectors share one non-zero, finite dimension (the configured one if set)
    fn validate(&self, vectors: &[EmbeddingVector]) -> Result<()> {
        let Some(first) = vectors.first() else {
            return Ok(());
        };

        let dimension = first.len();
        if dimension == 0 {
            return Err(EmbeddingError::Malformed("empty embedding vector".to_string()));
        }

        if let Some(expected) = self.config.expected_dimension {
            if dimension != expected {
                return Err(EmbeddingError::InvalidDimension {
                    expected,
                    actual: dimension,
                });
            }
        }

        for vector in vectors {
            if vector.len() != dimension {
                return Err(EmbeddingError::InvalidDimension {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            if vector.iter().any(|v| !v.is_finite()) {
                return Err(EmbeddingError::Malformed(
                    "embedding contains non-finite values".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Query the service health endpoint
    pub async fn health(&self) -> Result<ServiceHealth> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| EmbeddingError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(EmbeddingError::Status {
                status: response.status().as_u16(),
                message: "health check failed".to_string(),
            });
        }

        response
            .json()
            .await
            .map_err(|e| EmbeddingError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Option<Vec<EmbeddingVector>> {
        match self.try_embed(texts).await {
            Ok(vectors) => Some(vectors),
            Err(e) => {
                warn!("Embedding service unavailable ({} texts): {}", texts.len(), e);
                None
            }
        }
    }

    async fn is_available(&self) -> bool {
        match self.health().await {
            Ok(health) => health.is_ok(),
            Err(e) => {
                debug!("Embedding health check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::{
        extract::State,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    /// Echoes `[char_count, 1, 0]` per text
    async fn echo_embed(Json(body): Json<Value>) -> Json<Value> {
        let embeddings: Vec<Vec<f32>> = body["texts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|t| vec![t.as_str().unwrap().chars().count() as f32, 1.0, 0.0])
            .collect();
        Json(json!({ "embeddings": embeddings, "dim": 3, "model": "test" }))
    }

    #[tokio::test]
    async fn test_embed_returns_vectors_in_input_order() {
        let base = spawn_server(Router::new().route("/embed", post(echo_embed))).await;
        let client = EmbeddingClient::new(EmbeddingConfig::new(base)).unwrap();

        let vectors = client.embed(&texts(&["감자", "오이장아찌"])).await.unwrap();

        assert_eq!(vectors, vec![vec![2.0, 1.0, 0.0], vec![5.0, 1.0, 0.0]]);
    }

    #[tokio::test]
    async fn test_empty_input_skips_network() {
        // Nothing listens on port 9 (discard); a request would fail
        let client = EmbeddingClient::new(EmbeddingConfig::new("http://127.0.0.1:9")).unwrap();

        assert_eq!(client.embed(&[]).await, Some(Vec::new()));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_none() {
        let client = EmbeddingClient::new(
            EmbeddingConfig::new("http://127.0.0.1:9").with_timeout(Duration::from_millis(500)),
        )
        .unwrap();

        assert!(client.embed(&texts(&["감자"])).await.is_none());
        assert!(!client.is_available().await);
    }

    #[tokio::test]
    async fn test_non_success_status_is_none() {
        let app = Router::new().route(
            "/embed",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "model not loaded") }),
        );
        let client = EmbeddingClient::new(EmbeddingConfig::new(spawn_server(app).await)).unwrap();

        let err = client.try_embed(&texts(&["감자"])).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Status { status: 500, .. }));
        assert!(client.embed(&texts(&["감자"])).await.is_none());
    }

    #[tokio::test]
    async fn test_malformed_payload_is_none() {
        let app = Router::new().route("/embed", post(|| async { Json(json!({ "vectors": [] })) }));
        let client = EmbeddingClient::new(EmbeddingConfig::new(spawn_server(app).await)).unwrap();

        let err = client.try_embed(&texts(&["감자"])).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Malformed(_)));
    }

    #[tokio::test]
    async fn test_count_mismatch_is_rejected() {
        let app = Router::new().route(
            "/embed",
            post(|| async { Json(json!({ "embeddings": [[1.0, 0.0]] })) }),
        );
        let client = EmbeddingClient::new(EmbeddingConfig::new(spawn_server(app).await)).unwrap();

        let err = client.try_embed(&texts(&["감자", "양파"])).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::CountMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[tokio::test]
    async fn test_ragged_vectors_are_rejected() {
        let app = Router::new().route(
            "/embed",
            post(|| async { Json(json!({ "embeddings": [[1.0, 0.0], [1.0]] })) }),
        );
        let client = EmbeddingClient::new(EmbeddingConfig::new(spawn_server(app).await)).unwrap();

        assert!(client.embed(&texts(&["감자", "양파"])).await.is_none());
    }

    #[tokio::test]
    async fn test_expected_dimension_is_enforced() {
        let base = spawn_server(Router::new().route("/embed", post(echo_embed))).await;
        let client =
            EmbeddingClient::new(EmbeddingConfig::new(base).with_expected_dimension(384)).unwrap();

        let err = client.try_embed(&texts(&["감자"])).await.unwrap_err();
        assert!(matches!(
            err,
            EmbeddingError::InvalidDimension {
                expected: 384,
                actual: 3
            }
        ));
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_none() {
        let app = Router::new().route(
            "/embed",
            post(|| async {
                tokio::time::sleep(Duration::from_millis(500)).await;
                Json(json!({ "embeddings": [[1.0]] }))
            }),
        );
        let client = EmbeddingClient::new(
            EmbeddingConfig::new(spawn_server(app).await).with_timeout(Duration::from_millis(100)),
        )
        .unwrap();

        let err = client.try_embed(&texts(&["감자"])).await.unwrap_err();
        assert!(matches!(err, EmbeddingError::Timeout(100)));
    }

    #[tokio::test]
    async fn test_large_batches_are_chunked() {
        let calls = Arc::new(AtomicUsize::new(0));

        async fn counting_embed(
            State(calls): State<Arc<AtomicUsize>>,
            body: Json<Value>,
        ) -> Json<Value> {
            calls.fetch_add(1, Ordering::SeqCst);
            echo_embed(body).await
        }

        let app = Router::new()
            .route("/embed", post(counting_embed))
            .with_state(calls.clone());
        let client = EmbeddingClient::new(
            EmbeddingConfig::new(spawn_server(app).await).with_max_batch_size(2),
        )
        .unwrap();

        let vectors = client
            .embed(&texts(&["가", "나나", "다다다", "라라라라", "마마마마마"]))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        let lengths: Vec<f32> = vectors.iter().map(|v| v[0]).collect();
        assert_eq!(lengths, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[tokio::test]
    async fn test_timeout_covers_all_chunks() {
        // Each chunk alone fits the timeout; the three together do not
        let app = Router::new().route(
            "/embed",
            post(|body: Json<Value>| async move {
                tokio::time::sleep(Duration::from_millis(200)).await;
                echo_embed(body).await
            }),
        );
        let client = EmbeddingClient::new(
            EmbeddingConfig::new(spawn_server(app).await)
                .with_max_batch_size(1)
                .with_timeout(Duration::from_millis(450)),
        )
        .unwrap();

        let err = client
            .try_embed(&texts(&["감자", "양파", "소금"]))
            .await
            .unwrap_err();
        assert!(matches!(err, EmbeddingError::Timeout(450)));

        let single = client.try_embed(&texts(&["감자"])).await.unwrap();
        assert_eq!(single.len(), 1);
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = Router::new().route(
            "/",
            get(|| async { Json(json!({ "status": "ok", "model": "minilm" })) }),
        );
        let client = EmbeddingClient::new(EmbeddingConfig::new(spawn_server(app).await)).unwrap();

        assert!(client.is_available().await);
        assert_eq!(client.health().await.unwrap().model.as_deref(), Some("minilm"));
    }

    #[tokio::test]
    async fn test_disabled_embedder() {
        let embedder = DisabledEmbedder;
        assert_eq!(embedder.embed(&[]).await, Some(Vec::new()));
        assert!(embedder.embed(&texts(&["감자"])).await.is_none());
        assert!(!embedder.is_available().await);
    }
}
