//! Have/need reconciliation against a grocery list
//!
//! Each batch picks its strategy by probing the embedder: one batched embed
//! call over the recipe ingredients followed by the grocery items. If it
//! answers, items are compared by cosine similarity; otherwise by substring
//! containment of normalized names. The probe runs on every call.

use std::sync::Arc;

use pantry_core::{
    CanonicalDictionary, Classification, MatchResult, MentionOutcome, MentionStatus,
    RawIngredientMention, ReconcileMode, ReconciliationReport,
};
use pantry_embedding::{Embedder, EmbeddingVector, SimilarityMatcher};
use tracing::{debug, instrument};

use crate::{config::ReconcileConfig, fuzzy::FuzzyMatcher, normalize::normalize};

/// Strategy selected for one batch
enum Strategy {
    EmbeddingEnabled {
        recipe: Vec<EmbeddingVector>,
        grocery: Vec<EmbeddingVector>,
    },
    StringFallback,
}

impl Strategy {
    fn mode(&self) -> ReconcileMode {
        match self {
            Strategy::EmbeddingEnabled { .. } => ReconcileMode::EmbeddingEnabled,
            Strategy::StringFallback => ReconcileMode::StringFallback,
        }
    }
}

/// Grocery names with blank (after normalization) entries removed
fn usable_grocery(grocery: &[String]) -> Vec<&String> {
    grocery
        .iter()
        .filter(|item| !normalize(item).is_empty())
        .collect()
}

fn substring_flags(ingredients: &[String], grocery: &[&String]) -> Vec<bool> {
    let grocery: Vec<String> = grocery.iter().map(|item| normalize(item)).collect();

    ingredients
        .iter()
        .map(|ingredient| {
            let ingredient = normalize(ingredient);
            !ingredient.is_empty()
                && grocery
                    .iter()
                    .any(|item| ingredient.contains(item.as_str()) || item.contains(&ingredient))
        })
        .collect()
}

fn split_by_flags(ingredients: &[String], flags: &[bool], mode: ReconcileMode) -> Classification {
    let mut classification = Classification::empty(mode);
    for (ingredient, &have) in ingredients.iter().zip(flags) {
        if have {
            classification.have.push(ingredient.clone());
        } else {
            classification.need.push(ingredient.clone());
        }
    }
    classification
}

/// Classify by bidirectional substring containment of normalized names
///
/// Blank grocery names are ignored; blank ingredients are always "need".
pub fn classify_by_substring(ingredients: &[String], grocery: &[String]) -> Classification {
    let grocery = usable_grocery(grocery);
    let flags = substring_flags(ingredients, &grocery);
    split_by_flags(ingredients, &flags, ReconcileMode::StringFallback)
}

/// Reconciliation orchestrator shared across requests
pub struct Reconciler {
    embedder: Arc<dyn Embedder>,
    dictionary: Arc<CanonicalDictionary>,
    config: ReconcileConfig,
    fuzzy: FuzzyMatcher,
}

impl Reconciler {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        dictionary: Arc<CanonicalDictionary>,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            embedder,
            dictionary,
            fuzzy: FuzzyMatcher::new(config.max_fuzzy_score),
            config,
        }
    }

    pub fn embedder(&self) -> &Arc<dyn Embedder> {
        &self.embedder
    }

    pub fn dictionary(&self) -> &Arc<CanonicalDictionary> {
        &self.dictionary
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// Map a free-text name onto the dictionary with the fuzzy matcher
    pub fn resolve(&self, name: &str) -> Option<MatchResult> {
        self.fuzzy.resolve(name, self.dictionary.entries())
    }

    async fn select_strategy(&self, ingredients: &[String], grocery: &[&String]) -> Strategy {
        let texts: Vec<String> = ingredients
            .iter()
            .cloned()
            .chain(grocery.iter().map(|item| (*item).clone()))
            .collect();

        match self.embedder.embed(&texts).await {
            Some(mut vectors) if vectors.len() == texts.len() => {
                let grocery = vectors.split_off(ingredients.len());
                Strategy::EmbeddingEnabled {
                    recipe: vectors,
                    grocery,
                }
            }
            _ => Strategy::StringFallback,
        }
    }

    async fn classify_flags(
        &self,
        ingredients: &[String],
        grocery: &[String],
    ) -> (Vec<bool>, ReconcileMode) {
        let grocery = usable_grocery(grocery);

        // Nothing to compare; the answer is the same under either strategy
        if ingredients.is_empty() || grocery.is_empty() {
            return (vec![false; ingredients.len()], ReconcileMode::StringFallback);
        }

        let strategy = self.select_strategy(ingredients, &grocery).await;
        debug!(
            "Classifying {} ingredients against {} grocery items ({})",
            ingredients.len(),
            grocery.len(),
            strategy.mode()
        );

        let mode = strategy.mode();
        let flags = match strategy {
            Strategy::EmbeddingEnabled { recipe, grocery } => {
                SimilarityMatcher::new(self.config.similarity_threshold).matches(&recipe, &grocery)
            }
            Strategy::StringFallback => substring_flags(ingredients, &grocery),
        };

        (flags, mode)
    }

    /// Split recipe ingredients into have/need against the grocery list
    ///
    /// Every ingredient lands in exactly one list, in input order.
    #[instrument(skip(self, ingredients, grocery), fields(ingredient_count = ingredients.len(), grocery_count = grocery.len()))]
    pub async fn classify(&self, ingredients: &[String], grocery: &[String]) -> Classification {
        let (flags, mode) = self.classify_flags(ingredients, grocery).await;
        split_by_flags(ingredients, &flags, mode)
    }

    /// Resolve each mention and classify the matched canonical names
    ///
    /// Unresolved mentions are reported as unmatched, never dropped.
    #[instrument(skip(self, mentions, grocery), fields(mention_count = mentions.len()))]
    pub async fn reconcile_mentions(
        &self,
        mentions: &[RawIngredientMention],
        grocery: &[String],
    ) -> ReconciliationReport {
        let matches: Vec<Option<MatchResult>> =
            mentions.iter().map(|mention| self.resolve(&mention.text)).collect();

        let names: Vec<String> = matches
            .iter()
            .flatten()
            .map(|result| result.matched_name().to_string())
            .collect();

        let (flags, mode) = self.classify_flags(&names, grocery).await;
        let mut flags = flags.into_iter();

        let outcomes = mentions
            .iter()
            .cloned()
            .zip(matches)
            .map(|(mention, matched)| {
                let status = match &matched {
                    None => MentionStatus::Unmatched,
                    Some(_) if flags.next().unwrap_or(false) => MentionStatus::Have,
                    Some(_) => MentionStatus::Need,
                };
                MentionOutcome {
                    mention,
                    status,
                    matched,
                }
            })
            .collect();

        ReconciliationReport { outcomes, mode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pantry_core::CanonicalIngredient;
    use pantry_embedding::DisabledEmbedder;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn dictionary() -> Arc<CanonicalDictionary> {
        Arc::new(CanonicalDictionary::from_entries(vec![
            CanonicalIngredient::new("1", "감자"),
            CanonicalIngredient::new("2", "당근"),
            CanonicalIngredient::new("3", "소금"),
            CanonicalIngredient::new("4", "무장아찌"),
        ]))
    }

    fn fallback() -> Reconciler {
        Reconciler::new(
            Arc::new(DisabledEmbedder),
            dictionary(),
            ReconcileConfig::default(),
        )
    }

    /// Deterministic vectors: synonyms share an axis
    struct SynonymEmbedder {
        calls: AtomicUsize,
    }

    impl SynonymEmbedder {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    fn synonym_axis(text: &str) -> Vec<f32> {
        match text {
            "감자" | "포테이토" => vec![2.0, 0.0, 0.0],
            "소금" | "천일염" => vec![0.0, 3.0, 0.1],
            "당근" => vec![0.0, 0.0, 1.0],
            _ => vec![0.5, 0.5, 0.5],
        }
    }

    #[async_trait]
    impl Embedder for SynonymEmbedder {
        async fn embed(&self, texts: &[String]) -> Option<Vec<EmbeddingVector>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Some(texts.iter().map(|t| synonym_axis(t)).collect())
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    /// Answers with the wrong number of vectors
    struct ShortEmbedder;

    #[async_trait]
    impl Embedder for ShortEmbedder {
        async fn embed(&self, _texts: &[String]) -> Option<Vec<EmbeddingVector>> {
            Some(vec![vec![1.0, 0.0]])
        }

        async fn is_available(&self) -> bool {
            true
        }
    }

    #[tokio::test]
    async fn test_fallback_classification() {
        let result = fallback()
            .classify(&names(&["감자", "당근", "소금"]), &names(&["감자", "소금"]))
            .await;

        assert_eq!(result.have, names(&["감자", "소금"]));
        assert_eq!(result.need, names(&["당근"]));
        assert_eq!(result.mode, ReconcileMode::StringFallback);
    }

    #[tokio::test]
    async fn test_empty_ingredients() {
        let result = fallback().classify(&[], &names(&["감자"])).await;
        assert!(result.have.is_empty());
        assert!(result.need.is_empty());
    }

    #[tokio::test]
    async fn test_empty_grocery_means_all_need_in_both_modes() {
        let items = names(&["감자", "당근"]);

        let result = fallback().classify(&items, &[]).await;
        assert!(result.have.is_empty());
        assert_eq!(result.need, items);

        let embedder = Arc::new(SynonymEmbedder::new());
        let reconciler = Reconciler::new(embedder, dictionary(), ReconcileConfig::default());
        let result = reconciler.classify(&items, &[]).await;
        assert!(result.have.is_empty());
        assert_eq!(result.need, items);
    }

    #[tokio::test]
    async fn test_unavailable_embedder_matches_substring_classification() {
        let items = names(&["다진 마늘", "대파", "", "양파즙"]);
        let grocery = names(&["마늘", "양파", "  "]);

        let result = fallback().classify(&items, &grocery).await;
        assert_eq!(result, classify_by_substring(&items, &grocery));
        assert_eq!(result.have, names(&["다진 마늘", "양파즙"]));
        assert_eq!(result.need, names(&["대파", ""]));
    }

    #[tokio::test]
    async fn test_miscounted_embeddings_fall_back() {
        let reconciler = Reconciler::new(
            Arc::new(ShortEmbedder),
            dictionary(),
            ReconcileConfig::default(),
        );
        let result = reconciler
            .classify(&names(&["감자", "당근"]), &names(&["감자"]))
            .await;

        assert_eq!(result.mode, ReconcileMode::StringFallback);
        assert_eq!(result.have, names(&["감자"]));
    }

    #[tokio::test]
    async fn test_embedding_mode_matches_synonyms() {
        let embedder = Arc::new(SynonymEmbedder::new());
        let reconciler = Reconciler::new(
            embedder.clone(),
            dictionary(),
            ReconcileConfig::default(),
        );

        let result = reconciler
            .classify(&names(&["포테이토", "천일염", "당근"]), &names(&["감자", "소금"]))
            .await;

        assert_eq!(result.mode, ReconcileMode::EmbeddingEnabled);
        assert_eq!(result.have, names(&["포테이토", "천일염"]));
        assert_eq!(result.need, names(&["당근"]));
        // One batched call covering both lists
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_threshold_is_configurable() {
        // "기타" embeds to (0.5,0.5,0.5); cosine with 감자's axis is ~0.577
        let embedder = Arc::new(SynonymEmbedder::new());
        let items = names(&["기타"]);
        let grocery = names(&["감자"]);

        let strict = Reconciler::new(embedder.clone(), dictionary(), ReconcileConfig::default());
        assert_eq!(strict.classify(&items, &grocery).await.need, items);

        let loose = Reconciler::new(
            embedder,
            dictionary(),
            ReconcileConfig::default().with_similarity_threshold(0.5),
        );
        assert_eq!(loose.classify(&items, &grocery).await.have, items);
    }

    #[tokio::test]
    async fn test_mode_is_probed_per_call() {
        let embedder = Arc::new(SynonymEmbedder::new());
        let reconciler = Reconciler::new(embedder.clone(), dictionary(), ReconcileConfig::default());

        for _ in 0..3 {
            reconciler.classify(&names(&["감자"]), &names(&["감자"])).await;
        }
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_reconcile_mentions_reports_every_mention() {
        let reconciler = Reconciler::new(
            Arc::new(DisabledEmbedder),
            dictionary(),
            ReconcileConfig::default().with_max_fuzzy_score(3.0),
        );
        let mentions = vec![
            RawIngredientMention::new("장아찌").with_quantity("1봉"),
            RawIngredientMention::new("감 자"),
            RawIngredientMention::new("캐비어"),
        ];

        let report = reconciler
            .reconcile_mentions(&mentions, &names(&["감자"]))
            .await;

        assert_eq!(report.outcomes.len(), 3);
        assert_eq!(report.outcomes[0].status, MentionStatus::Need);
        assert_eq!(
            report.outcomes[0].matched.as_ref().map(|m| m.matched_name()),
            Some("무장아찌")
        );
        assert_eq!(report.outcomes[0].mention.quantity.as_deref(), Some("1봉"));
        assert_eq!(report.outcomes[1].status, MentionStatus::Have);
        assert_eq!(report.outcomes[2].status, MentionStatus::Unmatched);
        assert!(report.outcomes[2].matched.is_none());
        assert_eq!(report.canonical_names(MentionStatus::Have), vec!["감자"]);
    }

    #[test]
    fn test_resolve_uses_fuzzy_ladder() {
        let result = fallback().resolve("장아찌").unwrap();
        assert_eq!(result.matched_name(), "무장아찌");
    }
}
