//! Embedding client configuration

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

/// Configuration for [`EmbeddingClient`](crate::EmbeddingClient)
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Base URL of the embedding service (without the `/embed` path)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Largest number of texts the service accepts per request
    pub max_batch_size: usize,
    /// Dimension every vector must have, when known
    pub expected_dimension: Option<usize>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout: Duration::from_millis(8_000),
            max_batch_size: 50, // service truncates anything past 50 texts
            expected_dimension: None,
        }
    }
}

impl EmbeddingConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
        self.max_batch_size = max_batch_size;
        self
    }

    pub fn with_expected_dimension(mut self, dimension: usize) -> Self {
        self.expected_dimension = Some(dimension);
        self
    }

    /// Load embedding configuration from environment variables
    ///
    /// Expects:
    /// - EMBEDDING_URL: service base URL (unset means embeddings are disabled)
    /// - EMBEDDING_TIMEOUT_MS: request timeout in milliseconds
    /// - EMBEDDING_MAX_BATCH: texts per request
    /// - EMBEDDING_DIMENSION: expected vector dimension
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("EMBEDDING_URL").ok()?;
        let base_url = base_url.trim().to_string();
        if base_url.is_empty() {
            return None;
        }

        let defaults = Self::default();
        let timeout_ms = parse_env("EMBEDDING_TIMEOUT_MS", defaults.timeout.as_millis() as u64);
        let max_batch_size = parse_env("EMBEDDING_MAX_BATCH", defaults.max_batch_size).max(1);
        let expected_dimension = env::var("EMBEDDING_DIMENSION")
            .ok()
            .and_then(|raw| match raw.trim().parse::<usize>() {
                Ok(dim) if dim > 0 => Some(dim),
                _ => {
                    warn!("Ignoring invalid EMBEDDING_DIMENSION value: {}", raw);
                    None
                }
            });

        Some(Self {
            base_url,
            timeout: Duration::from_millis(timeout_ms),
            max_batch_size,
            expected_dimension,
        })
    }
}

fn parse_env<T: FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Invalid {} value '{}', using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
