//! Cosine similarity calculations

use ndarray::ArrayView1;
use tracing::debug;

use crate::types::EmbeddingVector;

/// Default cosine similarity at which a grocery item counts as "have"
pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.6;

/// Calculate cosine similarity between two embeddings
///
/// Returns a value in [-1.0, 1.0]. Mismatched dimensions and zero vectors
/// score 0.0.
///
/// Formula: cos(θ) = (A · B) / (||A|| ||B||)
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        debug!(
            "Cosine similarity on mismatched dimensions ({} vs {})",
            a.len(),
            b.len()
        );
        return 0.0;
    }

    let a_view = ArrayView1::from(a);
    let b_view = ArrayView1::from(b);

    let dot_product = a_view.dot(&b_view);
    let norm_a = a_view.dot(&a_view).sqrt();
    let norm_b = b_view.dot(&b_view).sqrt();

    // Avoid division by zero
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product / (norm_a * norm_b)) as f64
}

/// Scale a vector to unit L2 length; zero vectors are returned unchanged
pub fn l2_normalize(vector: &[f32]) -> EmbeddingVector {
    let view = ArrayView1::from(vector);
    let norm = view.dot(&view).sqrt();

    if norm == 0.0 || !norm.is_finite() {
        return vector.to_vec();
    }

    (&view / norm).to_vec()
}

/// Normalize every vector in a batch
pub fn normalize_all(vectors: &[EmbeddingVector]) -> Vec<EmbeddingVector> {
    vectors.iter().map(|v| l2_normalize(v)).collect()
}

/// Dot product of two vectors (cosine similarity when both are unit length)
pub fn dot(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }
    ArrayView1::from(a).dot(&ArrayView1::from(b))
}

/// Threshold matcher over unit vectors
#[derive(Debug, Clone, Copy)]
pub struct SimilarityMatcher {
    threshold: f32,
}

impl Default for SimilarityMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_SIMILARITY_THRESHOLD)
    }
}

impl SimilarityMatcher {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Index of the first candidate whose similarity reaches the threshold
    ///
    /// Both `query` and `candidates` must already be unit length.
    pub fn first_match(&self, query: &[f32], candidates: &[EmbeddingVector]) -> Option<usize> {
        candidates
            .iter()
            .position(|candidate| dot(query, candidate) >= self.threshold)
    }

    /// For each query, whether any candidate reaches the threshold
    ///
    /// Vectors are L2-normalized first, so raw service output is accepted.
    pub fn matches(&self, queries: &[EmbeddingVector], candidates: &[EmbeddingVector]) -> Vec<bool> {
        let candidates = normalize_all(candidates);

        queries
            .iter()
            .map(|query| {
                let query = l2_normalize(query);
                self.first_match(&query, &candidates).is_some()
            })
            .collect()
    }
}

/// Highest-scoring candidate by cosine similarity; ties go to the earliest
pub fn best_match<'a, I>(query: &[f32], candidates: I) -> Option<(usize, f64)>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    let mut best: Option<(usize, f64)> = None;

    for (idx, candidate) in candidates.into_iter().enumerate() {
        let score = cosine_similarity(query, candidate);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((idx, score)),
        }
    }

    best
}
