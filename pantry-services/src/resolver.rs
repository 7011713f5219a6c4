//! Embedding-indexed dictionary for recipe ingredient resolution
//!
//! Resolution order: exact name, then substring containment, then the
//! closest dictionary embedding. This is deliberately a different strategy
//! from [`crate::fuzzy`], which ranks by tier and jamo distance.

use std::sync::Arc;

use pantry_core::{CanonicalDictionary, CanonicalIngredient, MatchMethod, MatchResult};
use pantry_embedding::{best_match, Embedder, EmbeddingVector};
use tracing::{debug, info, instrument, warn};

use crate::fuzzy::{EXACT_SCORE, SUBSTRING_SCORE};

/// Dictionary plus optional per-entry embeddings, built once at startup
pub struct IngredientIndex {
    dictionary: Arc<CanonicalDictionary>,
    /// Parallel to `dictionary.entries()` when present
    embeddings: Option<Vec<EmbeddingVector>>,
}

impl IngredientIndex {
    /// Index without embeddings; the semantic tier always misses
    pub fn without_embeddings(dictionary: Arc<CanonicalDictionary>) -> Self {
        Self {
            dictionary,
            embeddings: None,
        }
    }

    /// Embed every dictionary name in one batched call
    ///
    /// An unavailable embedder leaves the index without embeddings.
    pub async fn build(dictionary: Arc<CanonicalDictionary>, embedder: &dyn Embedder) -> Self {
        if dictionary.is_empty() {
            return Self::without_embeddings(dictionary);
        }

        let names: Vec<String> = dictionary.iter().map(|entry| entry.name.clone()).collect();

        let embeddings = match embedder.embed(&names).await {
            Some(vectors) if vectors.len() == names.len() => {
                info!("Indexed {} dictionary embeddings", vectors.len());
                Some(vectors)
            }
            Some(vectors) => {
                warn!(
                    "Embedder returned {} vectors for {} names; index disabled",
                    vectors.len(),
                    names.len()
                );
                None
            }
            None => {
                warn!("Embeddings unavailable; recipe resolution limited to string matching");
                None
            }
        };

        Self {
            dictionary,
            embeddings,
        }
    }

    pub fn dictionary(&self) -> &CanonicalDictionary {
        &self.dictionary
    }

    pub fn has_embeddings(&self) -> bool {
        self.embeddings.is_some()
    }

    /// Resolve a recipe ingredient name to a dictionary entry
    #[instrument(skip(self, embedder))]
    pub async fn resolve(&self, name: &str, embedder: &dyn Embedder) -> Option<MatchResult> {
        let query = name.trim();
        let entries = self.dictionary.entries();

        if let Some(entry) = entries.iter().find(|entry| entry.name == query) {
            return Some(match_result(name, entry, MatchMethod::Exact, EXACT_SCORE));
        }

        if let Some(entry) = Self::shortest_containing(entries, query) {
            return Some(match_result(name, entry, MatchMethod::Substring, SUBSTRING_SCORE));
        }

        let embeddings = self.embeddings.as_ref()?;
        if query.is_empty() {
            return None;
        }

        let query_vector = embedder.embed(&[query.to_string()]).await?.into_iter().next()?;
        let indexed_dimension = embeddings.first().map_or(0, Vec::len);
        if query_vector.len() != indexed_dimension {
            warn!(
                "Query embedding has dimension {}, index has {}; skipping semantic match",
                query_vector.len(),
                indexed_dimension
            );
            return None;
        }
        let (idx, similarity) = best_match(&query_vector, embeddings.iter().map(Vec::as_slice))?;

        debug!(
            "Embedding match for {:?}: {:?} ({:.3})",
            query, entries[idx].name, similarity
        );
        Some(match_result(name, &entries[idx], MatchMethod::Embedding, similarity))
    }

    /// Entry whose name contains the query; shortest wins
    fn shortest_containing<'a>(
        entries: &'a [CanonicalIngredient],
        query: &str,
    ) -> Option<&'a CanonicalIngredient> {
        if query.is_empty() {
            return None;
        }

        let mut best: Option<(&CanonicalIngredient, usize)> = None;
        for entry in entries {
            if !entry.name.contains(query) {
                continue;
            }
            let length = entry.name.chars().count();
            if best.map_or(true, |(_, best_length)| length < best_length) {
                best = Some((entry, length));
            }
        }

        best.map(|(entry, _)| entry)
    }
}

fn match_result(
    input: &str,
    entry: &CanonicalIngredient,
    method: MatchMethod,
    score: f64,
) -> MatchResult {
    MatchResult {
        input: input.to_string(),
        ingredient: entry.clone(),
        method,
        score,
    }
}
