use chrono::{NaiveDate, Utc};
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::FridgeItem;
use crate::error::RecipeError;

/// Fields accepted when adding an item; only `name` is required
#[derive(Debug, Default, Clone, Deserialize)]
pub struct NewFridgeItem {
    #[serde(default)]
    pub name: Option<String>,
    /// Free text such as "2片", or a bare number
    #[serde(default)]
    pub quantity: Option<Value>,
    /// `YYYY-MM-DD`; blank means no expiry date
    #[serde(default)]
    pub expire_date: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

impl NewFridgeItem {
    pub fn named(name: impl Into<String>) -> Self {
        NewFridgeItem {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// Normalize into an item without id or timestamp
    fn validate(self) -> Result<FridgeItem, RecipeError> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| RecipeError::Validation("name is required".to_string()))?;

        let expire_date = match self.expire_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(value) => Some(NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
                RecipeError::Validation(format!("expire_date must be YYYY-MM-DD, got {}", value))
            })?),
        };

        let quantity = match self.quantity {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(Value::Number(number)) => Some(number.to_string()),
            Some(_) => {
                return Err(RecipeError::Validation(
                    "quantity must be text or a number".to_string(),
                ))
            }
        };

        Ok(FridgeItem {
            id: 0,
            name: name.to_string(),
            quantity: quantity.filter(|q| !q.trim().is_empty()),
            expire_date,
            note: self.note.filter(|note| !note.trim().is_empty()),
            created_at: None,
        })
    }
}

/// The fridge contents, optionally persisted to a JSON file.
///
/// The file holds the same JSON array that [`super::load_items`] reads, so a
/// store written by the server can be passed to `suggest --inventory`.
#[derive(Debug)]
pub struct InventoryStore {
    path: Option<PathBuf>,
    items: Mutex<Vec<FridgeItem>>,
}

impl InventoryStore {
    /// A store that lives only as long as the process
    pub fn in_memory() -> Self {
        InventoryStore {
            path: None,
            items: Mutex::new(Vec::new()),
        }
    }

    /// Open a file-backed store; a missing or empty file is an empty fridge
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RecipeError> {
        let path = path.into();
        let items: Vec<FridgeItem> = match tokio::fs::read_to_string(&path).await {
            Ok(contents) if contents.trim().is_empty() => Vec::new(),
            Ok(contents) => serde_json::from_str(&contents)?,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} fridge items from {}", items.len(), path.display());
        Ok(InventoryStore {
            path: Some(path),
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Validate and store a new item, returning it with its id and timestamp
    pub async fn add(&self, new_item: NewFridgeItem) -> Result<FridgeItem, RecipeError> {
        let mut item = new_item.validate()?;
        let mut items = self.items.lock().await;

        item.id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        item.created_at = Some(Utc::now());
        items.push(item.clone());

        if let Err(e) = self.persist(&items).await {
            items.pop();
            return Err(e);
        }

        info!("Added fridge item {} ({})", item.id, item.name);
        Ok(item)
    }

    /// All items, newest first
    pub async fn list(&self) -> Vec<FridgeItem> {
        let mut items = self.items.lock().await.clone();
        items.sort_by(|a, b| b.id.cmp(&a.id));
        items
    }

    /// Delete the item with `id`; returns how many items were removed
    pub async fn remove(&self, id: u64) -> Result<usize, RecipeError> {
        let mut items = self.items.lock().await;
        let Some(index) = items.iter().position(|item| item.id == id) else {
            debug!("No fridge item with id {}", id);
            return Ok(0);
        };

        let removed = items.remove(index);
        if let Err(e) = self.persist(&items).await {
            items.insert(index, removed);
            return Err(e);
        }

        info!("Removed fridge item {} ({})", removed.id, removed.name);
        Ok(1)
    }

    /// Write through a temporary file so a failed write leaves the old contents
    async fn persist(&self, items: &[FridgeItem]) -> Result<(), RecipeError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(items)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        debug!("Wrote {} fridge items to {}", items.len(), path.display());
        Ok(())
    }
}

impl Default for InventoryStore {
    fn default() -> Self {
        InventoryStore::in_memory()
    }
}
