//! Recipe site data types

use serde::{Deserialize, Serialize};

/// One card from the search listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeSummary {
    pub title: String,
    pub url: String,
    /// Review count shown on the card (0 when absent)
    pub reviews: u32,
}

/// Ingredient row on a recipe page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientRef {
    /// Material code from the `viewMaterial('<code>')` link, if linked
    pub code: Option<String>,
    /// Visible ingredient name
    pub name: String,
    /// Visible amount ("2개", "1큰술")
    pub amount: Option<String>,
}

/// Ingredient-focused view of a recipe page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePage {
    pub url: String,
    pub image: Option<String>,
    pub ingredients: Vec<IngredientRef>,
}

/// Full recipe detail for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeDetail {
    pub title: String,
    pub image: Option<String>,
    /// "name amount" lines
    pub ingredients: Vec<String>,
    pub steps: Vec<String>,
    pub tips: String,
    pub url: String,
}
