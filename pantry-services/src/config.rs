//! Reconciliation settings

use std::env;

use pantry_embedding::DEFAULT_SIMILARITY_THRESHOLD;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileConfig {
    /// Cosine similarity at or above which a grocery item counts as "have"
    pub similarity_threshold: f32,
    /// Fuzzy matches scoring above this are treated as unmatched
    pub max_fuzzy_score: Option<f64>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_fuzzy_score: None,
        }
    }
}

impl ReconcileConfig {
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_max_fuzzy_score(mut self, max_score: f64) -> Self {
        self.max_fuzzy_score = Some(max_score);
        self
    }

    /// Load from `SIMILARITY_THRESHOLD` and `MAX_FUZZY_SCORE`
    ///
    /// The threshold must lie in [-1, 1]; invalid values keep the default.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(raw) = env::var("SIMILARITY_THRESHOLD") {
            match raw.trim().parse::<f32>() {
                Ok(value) if (-1.0..=1.0).contains(&value) => config.similarity_threshold = value,
                _ => warn!(
                    "Invalid SIMILARITY_THRESHOLD value '{}', using default {}",
                    raw, config.similarity_threshold
                ),
            }
        }

        if let Ok(raw) = env::var("MAX_FUZZY_SCORE") {
            match raw.trim().parse::<f64>() {
                Ok(value) if value.is_finite() && value >= 0.0 => {
                    config.max_fuzzy_score = Some(value)
                }
                _ => warn!("Ignoring invalid MAX_FUZZY_SCORE value '{}'", raw),
            }
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReconcileConfig::default();
        assert_eq!(config.similarity_threshold, 0.6);
        assert_eq!(config.max_fuzzy_score, None);
    }

    #[test]
    fn test_builders() {
        let config = ReconcileConfig::default()
            .with_similarity_threshold(0.75)
            .with_max_fuzzy_score(4.0);
        assert_eq!(config.similarity_threshold, 0.75);
        assert_eq!(config.max_fuzzy_score, Some(4.0));
    }
}
