//! Reconciliation services for the Pantry backend
//!
//! This crate holds the business logic between the HTTP layer and the
//! clients: name normalization, dictionary matching, have/need
//! classification, receipt post-processing and recipe search.

pub mod config;
pub mod fuzzy;
pub mod normalize;
pub mod receipt;
pub mod recipe_service;
pub mod recommend;
pub mod reconciler;
pub mod resolver;

pub use config::ReconcileConfig;
pub use fuzzy::{find_closest, FuzzyMatcher};
pub use normalize::{normalize, phonetic_form};
pub use receipt::{
    parse_extraction, reconcile_receipt, FoodCategory, ReceiptEntry, ReceiptLine,
    FALLBACK_SHELF_DAYS,
};
pub use recipe_service::{RecipeMatch, RecipeService};
pub use recommend::{recommend, RecipeCandidate, Recommendation};
pub use reconciler::{classify_by_substring, Reconciler};
pub use resolver::IngredientIndex;
