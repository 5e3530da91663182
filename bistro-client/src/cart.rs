//! Cart - local selection of menu entries
//!
//! Purely local until checkout. At most one line per entry id; a line's
//! quantity is always >= 1.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{MenuEntry, OrderItem};

/// Selected menu entry with quantity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub entry_id: String,
    pub name: String,
    pub price: Decimal,
    pub quantity: u32,
}

impl CartLine {
    fn from_entry(entry: &MenuEntry) -> Self {
        Self {
            entry_id: entry.id.clone(),
            name: entry.name.clone(),
            price: entry.price,
            quantity: 1,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Ordered cart lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the entry's line if present, otherwise append it with quantity 1
    ///
    /// Returns whether the entry is in the cart afterwards.
    pub fn toggle(&mut self, entry: &MenuEntry) -> bool {
        if let Some(idx) = self.position(&entry.id) {
            self.lines.remove(idx);
            false
        } else {
            self.lines.push(CartLine::from_entry(entry));
            true
        }
    }

    /// +1; no-op (false) if absent
    pub fn increase(&mut self, entry_id: &str) -> bool {
        match self.position(entry_id) {
            Some(idx) => {
                self.lines[idx].quantity += 1;
                true
            }
            None => false,
        }
    }

    /// -1, removing the line below 1; no-op (false) if absent
    pub fn decrease(&mut self, entry_id: &str) -> bool {
        let Some(idx) = self.position(entry_id) else {
            return false;
        };
        if self.lines[idx].quantity <= 1 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity -= 1;
        }
        true
    }

    pub fn remove(&mut self, entry_id: &str) -> bool {
        match self.position(entry_id) {
            Some(idx) => {
                self.lines.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Sum of price x quantity; 0 when empty
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    pub fn contains(&self, entry_id: &str) -> bool {
        self.position(entry_id).is_some()
    }

    pub fn quantity(&self, entry_id: &str) -> Option<u32> {
        self.position(entry_id).map(|idx| self.lines[idx].quantity)
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Snapshot the lines as order items
    pub fn to_order_items(&self) -> Vec<OrderItem> {
        self.lines
            .iter()
            .map(|line| OrderItem {
                name: line.name.clone(),
                price: line.price,
                quantity: line.quantity,
            })
            .collect()
    }

    fn position(&self, entry_id: &str) -> Option<usize> {
        self.lines.iter().position(|l| l.entry_id == entry_id)
    }
}
