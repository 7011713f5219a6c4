//! Embeddings and semantic matching for ingredient names
//!
//! This crate talks to the sentence-embedding service used to compare
//! ingredient names by meaning rather than spelling.
//!
//! ## Features
//! - Batched `POST /embed` client with a bounded timeout and no retries
//! - Degrades to "unavailable" instead of failing the caller
//! - L2 normalization and cosine similarity
//! - Threshold matcher for have/need classification

pub mod client;
pub mod config;
pub mod error;
pub mod similarity;
pub mod types;

pub use client::{DisabledEmbedder, Embedder, EmbeddingClient};
pub use config::EmbeddingConfig;
pub use error::{EmbeddingError, Result};
pub use similarity::{
    best_match, cosine_similarity, l2_normalize, normalize_all, SimilarityMatcher,
    DEFAULT_SIMILARITY_THRESHOLD,
};
pub use types::{EmbeddingVector, ServiceHealth};
