//! Menu Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Menu category
///
/// The store sorts by the lowercase string, so every drink precedes every food.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MenuCategory {
    Food,
    Drink,
}

impl MenuCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuCategory::Food => "food",
            MenuCategory::Drink => "drink",
        }
    }

    /// Whether items of this category need the kitchen to be open
    pub fn needs_kitchen(&self) -> bool {
        matches!(self, MenuCategory::Food)
    }
}

impl fmt::Display for MenuCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn default_true() -> bool {
    true
}

/// Menu entry (catalog item)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Document id (assigned by the store)
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub category: MenuCategory,
    /// Price in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl MenuEntry {
    pub fn new(name: impl Into<String>, category: MenuCategory, price: Decimal) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            category,
            price,
            available: true,
        }
    }

    /// Orderable iff available and (not food or kitchen open)
    pub fn is_orderable(&self, kitchen_open: bool) -> bool {
        self.available && (!self.category.needs_kitchen() || kitchen_open)
    }

    /// Available, but blocked only because the kitchen is closed
    pub fn blocked_by_kitchen(&self, kitchen_open: bool) -> bool {
        self.available && self.category.needs_kitchen() && !kitchen_open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: MenuCategory, available: bool) -> MenuEntry {
        MenuEntry {
            available,
            ..MenuEntry::new("Test", category, Decimal::new(1000, 2))
        }
    }

    #[test]
    fn test_orderability_rule() {
        assert!(entry(MenuCategory::Food, true).is_orderable(true));
        assert!(!entry(MenuCategory::Food, true).is_orderable(false));
        assert!(entry(MenuCategory::Drink, true).is_orderable(false));
        assert!(!entry(MenuCategory::Drink, false).is_orderable(true));
        assert!(!entry(MenuCategory::Food, false).is_orderable(true));
    }

    #[test]
    fn test_blocked_by_kitchen() {
        assert!(entry(MenuCategory::Food, true).blocked_by_kitchen(false));
        assert!(!entry(MenuCategory::Food, false).blocked_by_kitchen(false));
        assert!(!entry(MenuCategory::Drink, true).blocked_by_kitchen(false));
    }

    #[test]
    fn test_decode_defaults_available() {
        let entry: MenuEntry =
            serde_json::from_str(r#"{"name":"Tea","category":"drink","price":10}"#).unwrap();
        assert!(entry.available);
        assert_eq!(entry.price, Decimal::from(10));
        assert_eq!(entry.category, MenuCategory::Drink);
    }
}
