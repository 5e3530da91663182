//! Checkout validation and order payload

use crate::cart::Cart;
use crate::catalog::money_value;
use crate::error::ValidationError;
use crate::store::Fields;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use shared::models::{OrderItem, OrderStatus};

/// Positive table number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableNumber(u32);

impl TableNumber {
    /// 解析桌号: 空值 -> 未选择, 非正整数 -> 无效
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::MissingTableNumber);
        }
        match input.parse::<u32>() {
            Ok(n) if n > 0 => Ok(Self(n)),
            _ => Err(ValidationError::InvalidTableNumber(input.to_string())),
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Checkout preconditions, in order: kitchen, table, cart
pub fn validate_checkout(
    kitchen_open: bool,
    table: &str,
    cart: &Cart,
) -> Result<TableNumber, ValidationError> {
    if !kitchen_open {
        return Err(ValidationError::KitchenClosed);
    }
    let table = TableNumber::parse(table)?;
    if cart.is_empty() {
        return Err(ValidationError::EmptyCart);
    }
    Ok(table)
}

/// Order payload snapshotted from the cart
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub user_id: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub table_number: TableNumber,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub note: Option<String>,
}

impl OrderDraft {
    pub fn new(
        user_id: impl Into<String>,
        user_name: Option<String>,
        user_email: Option<String>,
        table_number: TableNumber,
        cart: &Cart,
        note: Option<&str>,
    ) -> Self {
        let note = note
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        Self {
            user_id: user_id.into(),
            user_name,
            user_email,
            table_number,
            items: cart.to_order_items(),
            total: cart.total(),
            note,
        }
    }

    /// Fields for the order-creation write
    pub fn to_fields(&self) -> Fields {
        let items: Vec<Value> = self
            .items
            .iter()
            .map(|item| {
                json!({
                    "name": item.name,
                    "price": money_value(item.price),
                    "quantity": item.quantity,
                })
            })
            .collect();
        Fields::new()
            .set("userId", self.user_id.as_str())
            .set("userName", self.user_name.clone())
            .set("userEmail", self.user_email.clone())
            .set("tableNumber", self.table_number.get())
            .set("items", items)
            .set("total", money_value(self.total))
            .set("note", self.note.clone())
            .set("status", OrderStatus::Pending.as_str())
            .server_timestamp("createdAt")
    }
}
