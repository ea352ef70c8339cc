//! Fridge items: storing them and selecting which ones to cook with.
//!
//! [`InventoryStore`] records what is in the fridge; the functions here
//! decide which of those items to send to the recipe pipeline.

mod store;

pub use store::{InventoryStore, NewFridgeItem};

use crate::ingredients::classify;
use crate::model::Category;
use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::RecipeError;

/// A stored fridge item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FridgeItem {
    #[serde(default)]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default, deserialize_with = "deserialize_expire_date")]
    pub expire_date: Option<NaiveDate>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl FridgeItem {
    pub fn new(name: impl Into<String>) -> Self {
        FridgeItem {
            id: 0,
            name: name.into(),
            quantity: None,
            expire_date: None,
            note: None,
            created_at: None,
        }
    }

    pub fn expiring_on(mut self, date: NaiveDate) -> Self {
        self.expire_date = Some(date);
        self
    }

    /// Always derived from the name, never stored
    pub fn category(&self) -> Category {
        classify(&self.name)
    }

    pub fn expiry_status(&self, today: NaiveDate, window_days: i64) -> ExpiryStatus {
        expiry_status(self, today, window_days)
    }
}

/// Accepts `null`, `""`, `YYYY-MM-DD` or an RFC 3339 timestamp
fn deserialize_expire_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    let Some(value) = value else {
        return Ok(None);
    };

    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(Some(date));
    }

    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| Some(timestamp.date_naive()))
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
    /// No expiry date recorded
    Unknown,
    Fresh,
    ExpiringSoon,
    Expired,
}

/// Dates are compared as calendar days: an item expiring today is still usable.
/// A window reaching past the last representable date has no upper bound.
pub fn expiry_status(item: &FridgeItem, today: NaiveDate, window_days: i64) -> ExpiryStatus {
    let Some(date) = item.expire_date else {
        return ExpiryStatus::Unknown;
    };

    if date < today {
        return ExpiryStatus::Expired;
    }

    let within_window = today
        .checked_add_days(Days::new(window_days.max(0).unsigned_abs()))
        .map_or(true, |limit| date <= limit);

    if within_window {
        ExpiryStatus::ExpiringSoon
    } else {
        ExpiryStatus::Fresh
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    #[default]
    All,
    Expiring,
    Expired,
}

impl std::str::FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "expiring" => Ok(FilterMode::Expiring),
            "expired" => Ok(FilterMode::Expired),
            other => Err(format!("Unknown filter mode: {}", other)),
        }
    }
}

/// Items matching `mode` and, when given, `category`; input order is kept
pub fn filter_items<'a>(
    items: &'a [FridgeItem],
    mode: FilterMode,
    category: Option<Category>,
    today: NaiveDate,
    window_days: i64,
) -> Vec<&'a FridgeItem> {
    items
        .iter()
        .filter(|item| match mode {
            FilterMode::All => true,
            FilterMode::Expiring => {
                item.expiry_status(today, window_days) == ExpiryStatus::ExpiringSoon
            }
            FilterMode::Expired => item.expiry_status(today, window_days) == ExpiryStatus::Expired,
        })
        .filter(|item| category.map_or(true, |c| item.category() == c))
        .collect()
}

/// Names to hand to the recipe pipeline, in order
pub fn ingredient_names<'a, I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a FridgeItem>,
{
    items
        .into_iter()
        .map(|item| item.name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Read a JSON array of fridge items
pub async fn load_items(path: impl AsRef<Path>) -> Result<Vec<FridgeItem>, RecipeError> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}
