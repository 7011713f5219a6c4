//! Inventory-based recipe recommendation

use std::cmp::Ordering;

use pantry_core::ReconcileMode;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::reconciler::Reconciler;

/// Stored recipe considered for recommendation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeCandidate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(flatten)]
    pub recipe: RecipeCandidate,
    pub have: Vec<String>,
    pub need: Vec<String>,
    /// have / max(total, 1)
    pub match_score: f64,
    pub mode: ReconcileMode,
}

/// Rank recipes by the share of their ingredients already in the inventory
///
/// An empty inventory yields no recommendations. Equal scores keep their
/// input order.
#[instrument(skip_all, fields(recipe_count = recipes.len(), inventory_count = inventory.len()))]
pub async fn recommend(
    reconciler: &Reconciler,
    recipes: Vec<RecipeCandidate>,
    inventory: &[String],
) -> Vec<Recommendation> {
    if inventory.is_empty() {
        return Vec::new();
    }

    let mut ranked = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        let classification = reconciler.classify(&recipe.ingredients, inventory).await;
        ranked.push(Recommendation {
            match_score: classification.coverage(),
            have: classification.have,
            need: classification.need,
            mode: classification.mode,
            recipe,
        });
    }

    ranked.sort_by(|a, b| {
        b.match_score
            .partial_cmp(&a.match_score)
            .unwrap_or(Ordering::Equal)
    });
    ranked
}
