//! Canonical ingredient dictionary
//!
//! Loaded once at startup from a JSON object of `{"<id>": "<name>"}` pairs and
//! shared read-only afterwards. Entry order follows the source file, which
//! makes "earliest entry" tie-breaks reproducible.

use std::collections::HashMap;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::error::{PantryError, PantryResult};
use crate::ingredient::CanonicalIngredient;

/// Immutable id → name reference table
#[derive(Debug, Clone, Default)]
pub struct CanonicalDictionary {
    entries: Vec<CanonicalIngredient>,
    by_id: HashMap<String, usize>,
}

impl CanonicalDictionary {
    /// Build a dictionary from entries, keeping the first entry for a repeated id
    pub fn from_entries(entries: impl IntoIterator<Item = CanonicalIngredient>) -> Self {
        let mut dictionary = Self::default();

        for entry in entries {
            let name = entry.name.trim();
            if name.is_empty() {
                warn!("Skipping dictionary entry {} with blank name", entry.id);
                continue;
            }
            if dictionary.by_id.contains_key(&entry.id) {
                warn!("Duplicate dictionary id {}, keeping first entry", entry.id);
                continue;
            }

            dictionary
                .by_id
                .insert(entry.id.clone(), dictionary.entries.len());
            dictionary
                .entries
                .push(CanonicalIngredient::new(entry.id, name));
        }

        dictionary
    }

    /// Parse a JSON object of id → name pairs
    pub fn from_json_str(json: &str) -> PantryResult<Self> {
        let raw: IndexMap<String, String> = serde_json::from_str(json)
            .map_err(|e| PantryError::dictionary(format!("Invalid dictionary JSON: {}", e)))?;

        Ok(Self::from_entries(
            raw.into_iter()
                .map(|(id, name)| CanonicalIngredient::new(id, name)),
        ))
    }

    /// Load the dictionary from a JSON file on disk
    pub fn load<P: AsRef<Path>>(path: P) -> PantryResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            PantryError::dictionary(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let dictionary = Self::from_json_str(&contents)?;
        info!(
            "Loaded canonical dictionary from {}: {} entries",
            path.display(),
            dictionary.len()
        );

        Ok(dictionary)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in source order
    pub fn entries(&self) -> &[CanonicalIngredient] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalIngredient> {
        self.entries.iter()
    }

    /// Look up an entry by its identifier
    pub fn get(&self, id: &str) -> Option<&CanonicalIngredient> {
        self.by_id.get(id).map(|&idx| &self.entries[idx])
    }

    /// Display name for an identifier
    pub fn name_for(&self, id: &str) -> Option<&str> {
        self.get(id).map(|entry| entry.name.as_str())
    }
}
