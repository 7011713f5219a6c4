//! Recipe search with have/need classification
//!
//! Wraps the recipe crawler: listing search, concurrent detail fetches,
//! ingredient mapping through the dictionary and classification against
//! the caller's grocery list.

use std::sync::Arc;

use futures::future::join_all;
use pantry_core::ReconcileMode;
use pantry_recipes::{RecipeDetail, RecipeError, RecipePage, RecipeSearchClient, RecipeSummary};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::reconciler::Reconciler;

/// Search result enriched with ingredients and have/need split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeMatch {
    pub title: String,
    pub url: String,
    pub reviews: u32,
    pub image: Option<String>,
    pub ingredients: Vec<String>,
    pub have: Vec<String>,
    pub need: Vec<String>,
    pub mode: ReconcileMode,
}

pub struct RecipeService {
    client: RecipeSearchClient,
    reconciler: Arc<Reconciler>,
}

impl RecipeService {
    pub fn new(client: RecipeSearchClient, reconciler: Arc<Reconciler>) -> Self {
        Self { client, reconciler }
    }

    /// Canonical names for the ingredients of a recipe page
    ///
    /// Material codes are looked up in the dictionary; rows with an unknown
    /// code fall back to fuzzy matching of the visible name, and keep that
    /// name when nothing matches.
    pub fn ingredient_names(&self, page: &RecipePage) -> Vec<String> {
        let dictionary = self.reconciler.dictionary();

        page.ingredients
            .iter()
            .filter_map(|row| {
                if let Some(name) = row.code.as_deref().and_then(|code| dictionary.name_for(code)) {
                    return Some(name.to_string());
                }
                if row.name.is_empty() {
                    debug!(
                        "Dropping unnamed ingredient row with unknown code {:?}",
                        row.code
                    );
                    return None;
                }
                let resolved = self
                    .reconciler
                    .resolve(&row.name)
                    .map(|result| result.ingredient.name);
                Some(resolved.unwrap_or_else(|| row.name.clone()))
            })
            .collect()
    }

    async fn enrich(&self, summary: RecipeSummary, grocery: &[String]) -> RecipeMatch {
        let (image, ingredients) = match self.client.fetch_page(&summary.url).await {
            Ok(page) => {
                let names = self.ingredient_names(&page);
                (page.image, names)
            }
            Err(e) => {
                warn!("Failed to fetch recipe page {}: {}", summary.url, e);
                (None, Vec::new())
            }
        };

        let classification = self.reconciler.classify(&ingredients, grocery).await;

        RecipeMatch {
            title: summary.title,
            url: summary.url,
            reviews: summary.reviews,
            image,
            ingredients,
            have: classification.have,
            need: classification.need,
            mode: classification.mode,
        }
    }

    /// Search recipes by ingredient keywords and classify each against `grocery`
    ///
    /// A failed detail page keeps the recipe with an empty ingredient list.
    #[instrument(skip(self, grocery))]
    pub async fn search(
        &self,
        ingredients: &[String],
        grocery: &[String],
        limit: usize,
    ) -> Result<Vec<RecipeMatch>, RecipeError> {
        let summaries = self.client.search(ingredients, limit).await?;

        let recipes = join_all(
            summaries
                .into_iter()
                .map(|summary| self.enrich(summary, grocery)),
        )
        .await;

        info!("Recipe search returned {} recipes", recipes.len());
        Ok(recipes)
    }

    /// Full detail of a single recipe page
    pub async fn detail(&self, url: &str) -> Result<RecipeDetail, RecipeError> {
        self.client.fetch_detail(url).await
    }
}
