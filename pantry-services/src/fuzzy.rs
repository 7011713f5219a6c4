//! Tiered fuzzy matching of free-text names against the dictionary

use pantry_core::{CanonicalIngredient, MatchMethod, MatchResult};
use strsim::levenshtein;

use crate::normalize::{normalize, phonetic_form};

pub const EXACT_SCORE: f64 = 0.0;
pub const TOKEN_SCORE: f64 = 0.5;
pub const SUFFIX_SCORE: f64 = 1.0;
pub const SUBSTRING_SCORE: f64 = 2.0;
/// Added to the jamo edit distance so distance matches rank below containment
pub const DISTANCE_BASE_SCORE: f64 = 3.0;

/// Normalized forms of the input, computed once per lookup
struct Query {
    normalized: String,
    phonetic: String,
}

impl Query {
    fn new(input: &str) -> Self {
        let normalized = normalize(input);
        let phonetic = phonetic_form(&normalized);
        Self {
            normalized,
            phonetic,
        }
    }

    fn score(&self, candidate: &str) -> (f64, MatchMethod) {
        let target = normalize(candidate);

        if target == self.normalized {
            return (EXACT_SCORE, MatchMethod::Exact);
        }

        if !self.normalized.is_empty() {
            if candidate
                .split_whitespace()
                .any(|token| normalize(token) == self.normalized)
            {
                return (TOKEN_SCORE, MatchMethod::Token);
            }
            if target.ends_with(&self.normalized) {
                return (SUFFIX_SCORE, MatchMethod::Suffix);
            }
            if target.contains(&self.normalized) {
                return (SUBSTRING_SCORE, MatchMethod::Substring);
            }
        }

        let distance = levenshtein(&self.phonetic, &phonetic_form(&target));
        (
            DISTANCE_BASE_SCORE + distance as f64,
            MatchMethod::FuzzyDistance,
        )
    }
}

/// Find the closest canonical ingredient to `input`
///
/// Lower scores win; ties go to the shorter name, then the earlier entry.
/// Only an empty candidate list yields `None`.
pub fn find_closest(input: &str, candidates: &[CanonicalIngredient]) -> Option<MatchResult> {
    let query = Query::new(input);

    // (index, score, method, name length)
    let mut best: Option<(usize, f64, MatchMethod, usize)> = None;

    for (idx, candidate) in candidates.iter().enumerate() {
        let (score, method) = query.score(&candidate.name);
        let length = candidate.name.chars().count();

        let better = match best {
            None => true,
            Some((_, best_score, _, best_length)) => {
                score < best_score || (score == best_score && length < best_length)
            }
        };

        if better {
            best = Some((idx, score, method, length));
        }
    }

    best.map(|(idx, score, method, _)| MatchResult {
        input: input.to_string(),
        ingredient: candidates[idx].clone(),
        method,
        score,
    })
}

/// Fuzzy matcher with an optional acceptance cutoff
#[derive(Debug, Clone, Copy, Default)]
pub struct FuzzyMatcher {
    max_score: Option<f64>,
}

impl FuzzyMatcher {
    pub fn new(max_score: Option<f64>) -> Self {
        Self { max_score }
    }

    pub fn max_score(&self) -> Option<f64> {
        self.max_score
    }

    /// Closest match, rejected when its score exceeds the cutoff
    pub fn resolve(&self, input: &str, candidates: &[CanonicalIngredient]) -> Option<MatchResult> {
        let result = find_closest(input, candidates)?;
        match self.max_score {
            Some(max) if result.score > max => None,
            _ => Some(result),
        }
    }
}
