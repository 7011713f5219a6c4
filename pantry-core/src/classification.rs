//! Have/need classification records

use serde::{Deserialize, Serialize};

use crate::ingredient::{MatchResult, RawIngredientMention};

/// Strategy a reconciliation batch ran under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Embedding service answered for the whole batch
    EmbeddingEnabled,
    /// Embedding service unavailable, substring containment used
    StringFallback,
}

impl std::fmt::Display for ReconcileMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReconcileMode::EmbeddingEnabled => write!(f, "embedding_enabled"),
            ReconcileMode::StringFallback => write!(f, "string_fallback"),
        }
    }
}

/// Split of recipe ingredients into what the user has and what they need
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub have: Vec<String>,
    pub need: Vec<String>,
    pub mode: ReconcileMode,
}

impl Classification {
    pub fn empty(mode: ReconcileMode) -> Self {
        Self {
            have: Vec::new(),
            need: Vec::new(),
            mode,
        }
    }

    /// Total number of classified ingredients
    pub fn len(&self) -> usize {
        self.have.len() + self.need.len()
    }

    pub fn is_empty(&self) -> bool {
        self.have.is_empty() && self.need.is_empty()
    }

    /// Fraction of ingredients already on hand (0.0 when there are none)
    pub fn coverage(&self) -> f64 {
        self.have.len() as f64 / self.len().max(1) as f64
    }
}

/// Final state of a single mention after reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MentionStatus {
    Have,
    Need,
    Unmatched,
}

/// One reconciled mention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentionOutcome {
    pub mention: RawIngredientMention,
    pub status: MentionStatus,
    /// Dictionary match; `None` exactly when `status` is `Unmatched`
    pub matched: Option<MatchResult>,
}

/// Reconciliation of a batch of mentions, one outcome per input in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    pub outcomes: Vec<MentionOutcome>,
    pub mode: ReconcileMode,
}

impl ReconciliationReport {
    pub fn count(&self, status: MentionStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    /// Canonical names of mentions with the given status
    pub fn canonical_names(&self, status: MentionStatus) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter(|o| o.status == status)
            .filter_map(|o| o.matched.as_ref().map(|m| m.matched_name()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage() {
        let classification = Classification {
            have: vec!["감자".into(), "소금".into()],
            need: vec!["당근".into()],
            mode: ReconcileMode::StringFallback,
        };
        assert_eq!(classification.len(), 3);
        assert!((classification.coverage() - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(Classification::empty(ReconcileMode::StringFallback).coverage(), 0.0);
    }

    #[test]
    fn test_mode_serialization() {
        let json = serde_json::to_string(&ReconcileMode::EmbeddingEnabled).unwrap();
        assert_eq!(json, "\"embedding_enabled\"");
        assert_eq!(ReconcileMode::StringFallback.to_string(), "string_fallback");
    }
}
