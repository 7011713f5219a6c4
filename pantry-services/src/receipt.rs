//! Post-processing of receipt extraction output
//!
//! The extraction stage returns a JSON object keyed by item name:
//! `{"양파": ["채소", 2, 3, "2025-01-18"], ...}`. Field types are not
//! reliable, so every field is read leniently.

use chrono::{Days, NaiveDate};
use indexmap::IndexMap;
use pantry_core::{MatchResult, PantryError, PantryResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::reconciler::Reconciler;

/// Shelf life used when neither the item nor its category provides one
pub const FALLBACK_SHELF_DAYS: u32 = 7;

/// Upper bound on shelf life; longer values are clamped
pub const MAX_SHELF_DAYS: u32 = 3650;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodCategory {
    Meat,
    Fish,
    Vegetable,
    Fruit,
    Processed,
    Dairy,
    Grain,
    Other,
}

impl FoodCategory {
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "육류" => FoodCategory::Meat,
            "생선" | "어류" => FoodCategory::Fish,
            "채소" => FoodCategory::Vegetable,
            "과일" => FoodCategory::Fruit,
            "가공식품" => FoodCategory::Processed,
            "유제품" => FoodCategory::Dairy,
            "곡류" => FoodCategory::Grain,
            _ => FoodCategory::Other,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FoodCategory::Meat => "육류",
            FoodCategory::Fish => "생선",
            FoodCategory::Vegetable => "채소",
            FoodCategory::Fruit => "과일",
            FoodCategory::Processed => "가공식품",
            FoodCategory::Dairy => "유제품",
            FoodCategory::Grain => "곡류",
            FoodCategory::Other => "기타",
        }
    }

    /// Typical refrigerated shelf life in days
    pub fn default_shelf_days(&self) -> Option<u32> {
        match self {
            FoodCategory::Meat | FoodCategory::Vegetable => Some(3),
            FoodCategory::Fish => Some(2),
            FoodCategory::Fruit => Some(5),
            FoodCategory::Processed | FoodCategory::Grain => Some(30),
            FoodCategory::Dairy => Some(14),
            FoodCategory::Other => None,
        }
    }
}

/// One extracted receipt item with a recomputed expiry date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptEntry {
    pub name: String,
    pub category: FoodCategory,
    pub quantity: u32,
    pub shelf_days: u32,
    pub expiry_date: NaiveDate,
}

/// Receipt entry with its dictionary match
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptLine {
    #[serde(flatten)]
    pub entry: ReceiptEntry,
    /// `None` when the name could not be mapped onto the dictionary
    pub matched: Option<MatchResult>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Extraction {
    Items(IndexMap<String, Value>),
    Wrapped(Vec<IndexMap<String, Value>>),
}

/// Remove a surrounding Markdown code fence, if any
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop the info string ("json") on the opening line
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().trim_end_matches("```").trim()
}

/// Leading decimal digits of a string ("3일" -> 3)
fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

fn positive_number(value: Option<&Value>) -> Option<u32> {
    let number = match value? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => leading_number(s),
        _ => None,
    };
    number.filter(|n| *n > 0)
}

fn parse_item(name: &str, value: &Value, today: NaiveDate) -> ReceiptEntry {
    let fields = value.as_array().map(Vec::as_slice).unwrap_or(&[]);

    let category = fields
        .first()
        .and_then(Value::as_str)
        .map(FoodCategory::from_label)
        .unwrap_or(FoodCategory::Other);

    let quantity = positive_number(fields.get(1)).unwrap_or(1);

    let shelf_days = positive_number(fields.get(2))
        .or_else(|| category.default_shelf_days())
        .unwrap_or(FALLBACK_SHELF_DAYS)
        .min(MAX_SHELF_DAYS);

    // Saturates at the end of the calendar instead of overflowing
    let expiry_date = today
        .checked_add_days(Days::new(u64::from(shelf_days)))
        .unwrap_or(NaiveDate::MAX);

    ReceiptEntry {
        name: name.to_string(),
        category,
        quantity,
        shelf_days,
        expiry_date,
    }
}

/// Parse extraction output into entries, in the order the items appear
///
/// Expiry dates are always recomputed from `today`; the date in the input
/// is ignored.
pub fn parse_extraction(raw: &str, today: NaiveDate) -> PantryResult<Vec<ReceiptEntry>> {
    let body = strip_code_fence(raw);
    if body.is_empty() {
        return Ok(Vec::new());
    }

    // Wrapped lists are flattened in order; repeated names across objects
    // stay separate items
    let items: Vec<(String, Value)> = match serde_json::from_str::<Extraction>(body)
        .map_err(|e| PantryError::parse(format!("Invalid receipt extraction: {}", e)))?
    {
        Extraction::Items(items) => items.into_iter().collect(),
        Extraction::Wrapped(list) => list.into_iter().flatten().collect(),
    };

    let entries: Vec<ReceiptEntry> = items
        .iter()
        .filter_map(|(name, value)| {
            let name = name.trim();
            if name.is_empty() {
                warn!("Skipping receipt item with a blank name");
                return None;
            }
            Some(parse_item(name, value, today))
        })
        .collect();

    debug!("Parsed {} receipt items", entries.len());
    Ok(entries)
}

/// Map each receipt entry onto the dictionary
///
/// Entries are never merged, even when two map to the same ingredient.
pub fn reconcile_receipt(entries: Vec<ReceiptEntry>, reconciler: &Reconciler) -> Vec<ReceiptLine> {
    entries
        .into_iter()
        .map(|entry| {
            let matched = reconciler.resolve(&entry.name);
            ReceiptLine { entry, matched }
        })
        .collect()
}
