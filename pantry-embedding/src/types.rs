//! Wire types for the embedding service

use serde::{Deserialize, Serialize};

/// Embedding vector (384 dimensions for the multilingual MiniLM deployment)
pub type EmbeddingVector = Vec<f32>;

/// `POST /embed` request body
#[derive(Debug, Serialize)]
pub struct EmbedRequest<'a> {
    pub texts: &'a [String],
}

/// `POST /embed` response body
#[derive(Debug, Clone, Deserialize)]
pub struct EmbedResponse {
    /// One vector per input text, in input order
    pub embeddings: Vec<EmbeddingVector>,
    /// Reported vector dimension
    #[serde(default)]
    pub dim: Option<usize>,
    /// Number of texts the service actually encoded
    #[serde(default)]
    pub count: Option<usize>,
    /// Model name
    #[serde(default)]
    pub model: Option<String>,
}

/// `GET /` health response
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceHealth {
    pub status: String,
    #[serde(default)]
    pub model: Option<String>,
}

impl ServiceHealth {
    pub fn is_ok(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok")
    }
}
