//! Ingredient reference data and match records

use serde::{Deserialize, Serialize};

/// Authoritative dictionary entry for a foodstuff
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalIngredient {
    /// Opaque identifier (the recipe site's material code)
    pub id: String,
    /// Display name
    pub name: String,
}

impl CanonicalIngredient {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Free text extracted from a receipt or a recipe page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawIngredientMention {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

impl RawIngredientMention {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quantity: None,
        }
    }

    pub fn with_quantity(mut self, quantity: impl Into<String>) -> Self {
        self.quantity = Some(quantity.into());
        self
    }
}

/// How a match was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchMethod {
    /// Normalized forms are identical
    Exact,
    /// Input equals one whitespace-separated token of the candidate
    Token,
    /// Candidate ends with the input
    Suffix,
    /// Candidate contains the input
    Substring,
    /// Edit distance over jamo
    FuzzyDistance,
    /// Cosine similarity of embeddings
    Embedding,
}

impl MatchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMethod::Exact => "exact",
            MatchMethod::Token => "token",
            MatchMethod::Suffix => "suffix",
            MatchMethod::Substring => "substring",
            MatchMethod::FuzzyDistance => "fuzzy-distance",
            MatchMethod::Embedding => "embedding",
        }
    }
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of resolving one free-text name against the dictionary
///
/// `score` is method-specific: for the string tiers it is the tier value
/// (lower is better), for [`MatchMethod::Embedding`] it is the cosine
/// similarity (higher is better).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub input: String,
    pub ingredient: CanonicalIngredient,
    pub method: MatchMethod,
    pub score: f64,
}

impl MatchResult {
    /// Canonical name the input resolved to
    pub fn matched_name(&self) -> &str {
        &self.ingredient.name
    }
}
