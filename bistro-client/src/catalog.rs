//! Catalog Cache - in-memory mirror of the menu collection
//!
//! Every push replaces the whole entry list (no incremental merge). Admin
//! mutations write through to the store and are reflected locally only via
//! the next push.

use crate::cart::Cart;
use crate::error::{ClientResult, ValidationError};
use crate::store::{decode_snapshot, Direction, DocumentStore, Fields, Query, Snapshot};
use parking_lot::RwLock;
use rust_decimal::prelude::*;
use serde::Serialize;
use shared::collections;
use shared::models::{MenuCategory, MenuEntry};
use std::str::FromStr;
use std::sync::Arc;

/// Live query: by category, then name
pub fn catalog_query() -> Query {
    Query::collection(collections::MENU)
        .order_by("category", Direction::Ascending)
        .order_by("name", Direction::Ascending)
}

/// Monetary value as stored (float number)
pub(crate) fn money_value(amount: Decimal) -> serde_json::Value {
    serde_json::Value::from(amount.to_f64().unwrap_or_default())
}

/// Seed the built-in menu if the collection is observed empty
///
/// Two clients seeing an empty catalog at the same moment may both seed.
pub async fn seed_if_empty(store: &dyn DocumentStore) -> ClientResult<bool> {
    let existing = store.query(&Query::collection(collections::MENU)).await?;
    if !existing.is_empty() {
        return Ok(false);
    }
    let seed = shared::seed::seed_menu();
    tracing::info!(items = seed.len(), "Menu is empty, seeding built-in catalog");
    for entry in &seed {
        store
            .add(
                collections::MENU,
                MenuEntryDraft::from_entry(entry).to_fields(entry.available),
            )
            .await?;
    }
    Ok(true)
}

/// Validated name/category/price for admin add and edit
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntryDraft {
    pub name: String,
    pub category: MenuCategory,
    pub price: Decimal,
}

impl MenuEntryDraft {
    /// Validate raw form input
    pub fn parse(name: &str, category: MenuCategory, price: &str) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        let raw = price.trim();
        if raw.is_empty() {
            return Err(ValidationError::InvalidPrice(price.to_string()));
        }
        let price = Decimal::from_str(&raw.replace(',', "."))
            .map_err(|_| ValidationError::InvalidPrice(price.to_string()))?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(ValidationError::InvalidPrice(raw.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            category,
            price,
        })
    }

    fn from_entry(entry: &MenuEntry) -> Self {
        Self {
            name: entry.name.clone(),
            category: entry.category,
            price: entry.price,
        }
    }

    fn base_fields(&self) -> Fields {
        Fields::new()
            .set("name", self.name.as_str())
            .set("category", self.category.as_str())
            .set("price", money_value(self.price))
    }

    /// Fields for a new entry
    pub(crate) fn to_fields(&self, available: bool) -> Fields {
        self.base_fields().set("available", available)
    }
}

/// Menu tile view model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuTile {
    pub entry: MenuEntry,
    /// Can be selected right now
    pub orderable: bool,
    /// Currently in the cart
    pub selected: bool,
    /// Shown in the "kitchen closed" state
    pub kitchen_closed: bool,
}

/// In-memory menu mirror
#[derive(Debug, Clone, Default)]
pub struct CatalogCache {
    entries: Arc<RwLock<Vec<MenuEntry>>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the mirror with a pushed snapshot
    pub fn apply_snapshot(&self, snapshot: &Snapshot) {
        let entries: Vec<MenuEntry> = decode_snapshot(collections::MENU, snapshot);
        tracing::debug!(entries = entries.len(), "Catalog snapshot applied");
        *self.entries.write() = entries;
    }

    pub fn entries(&self) -> Vec<MenuEntry> {
        self.entries.read().clone()
    }

    pub fn get(&self, id: &str) -> Option<MenuEntry> {
        self.entries.read().iter().find(|e| e.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Tiles for a customer-facing menu, evaluated against current state
    pub fn tiles(&self, kitchen_open: bool, cart: &Cart) -> Vec<MenuTile> {
        self.entries
            .read()
            .iter()
            .map(|entry| MenuTile {
                orderable: entry.is_orderable(kitchen_open),
                selected: cart.contains(&entry.id),
                kitchen_closed: entry.blocked_by_kitchen(kitchen_open),
                entry: entry.clone(),
            })
            .collect()
    }
}

// =============================================================================
// Admin write-through operations
// =============================================================================

pub async fn add_entry(store: &dyn DocumentStore, draft: &MenuEntryDraft) -> ClientResult<String> {
    let id = store
        .add(collections::MENU, draft.to_fields(true))
        .await
        .inspect_err(|e| tracing::error!(name = %draft.name, error = %e, "Failed to add menu entry"))?;
    tracing::info!(entry_id = %id, name = %draft.name, "Menu entry added");
    Ok(id)
}

pub async fn edit_entry(
    store: &dyn DocumentStore,
    entry_id: &str,
    draft: &MenuEntryDraft,
) -> ClientResult<()> {
    store
        .update(collections::MENU, entry_id, draft.base_fields())
        .await
        .inspect_err(|e| tracing::error!(entry_id = %entry_id, error = %e, "Failed to edit menu entry"))?;
    tracing::info!(entry_id = %entry_id, "Menu entry edited");
    Ok(())
}

pub async fn set_availability(
    store: &dyn DocumentStore,
    entry_id: &str,
    available: bool,
) -> ClientResult<()> {
    store
        .update(
            collections::MENU,
            entry_id,
            Fields::new().set("available", available),
        )
        .await
        .inspect_err(|e| tracing::error!(entry_id = %entry_id, error = %e, "Failed to change availability"))?;
    tracing::info!(entry_id = %entry_id, available, "Menu entry availability changed");
    Ok(())
}

pub async fn delete_entry(store: &dyn DocumentStore, entry_id: &str) -> ClientResult<()> {
    store
        .delete(collections::MENU, entry_id)
        .await
        .inspect_err(|e| tracing::error!(entry_id = %entry_id, error = %e, "Failed to delete menu entry"))?;
    tracing::info!(entry_id = %entry_id, "Menu entry deleted");
    Ok(())
}
