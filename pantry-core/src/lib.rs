//! Core types for the Pantry backend
//!
//! This crate defines the shared data structures used across the workspace:
//! the canonical ingredient dictionary, match records and have/need
//! classifications produced by the reconciliation pipeline.

pub mod classification;
pub mod dictionary;
pub mod error;
pub mod ingredient;

pub use classification::{
    Classification, MentionOutcome, MentionStatus, ReconcileMode, ReconciliationReport,
};
pub use dictionary::CanonicalDictionary;
pub use error::{PantryError, PantryResult};
pub use ingredient::{CanonicalIngredient, MatchMethod, MatchResult, RawIngredientMention};
