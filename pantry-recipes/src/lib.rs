//! Recipe site crawler
//!
//! Searches the recipe listing by ingredient keywords and extracts
//! ingredient lists, steps and tips from recipe pages.

pub mod client;
pub mod error;
pub mod parse;
pub mod types;

pub use client::{RecipeClientConfig, RecipeSearchClient, DEFAULT_RECIPE_BASE_URL};
pub use error::RecipeError;
pub use types::{IngredientRef, RecipeDetail, RecipePage, RecipeSummary};
