//! Order Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Order status
///
/// Transitions only `Pending -> Accepted`, exactly once.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Accepted => "accepted",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Item snapshot copied from the cart at checkout
///
/// Decoupled from the live menu entry so later catalog edits never touch
/// historical orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    /// Price in currency unit
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl OrderItem {
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Document id (assigned by the store)
    #[serde(default)]
    pub id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    pub table_number: u32,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Stored at submission time, never recomputed from items
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub status: OrderStatus,
    /// Server-assigned; absent until the store has resolved the write
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accepted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub accepted_by: Option<String>,
}

impl Order {
    /// Sort key for creation time; a missing timestamp counts as 0
    pub fn created_at_key(&self) -> i64 {
        self.created_at.map(|t| t.timestamp_micros()).unwrap_or(0)
    }

    /// First 6 characters of the id
    pub fn short_id(&self) -> &str {
        match self.id.char_indices().nth(6) {
            Some((idx, _)) => &self.id[..idx],
            None => &self.id,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    /// Display name of the ordering user, falling back to the user id
    pub fn user_label(&self) -> &str {
        self.user_name.as_deref().unwrap_or(&self.user_id)
    }
}
