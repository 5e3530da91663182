//! Order card view model

use chrono_tz::Tz;
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{Order, OrderStatus};

/// Shown while the server timestamp is not known yet
pub const JUST_NOW: &str = "just now";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCardLine {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub line_total: Decimal,
}

/// Ordering user, staff views only
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCardUser {
    pub name: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderCard {
    pub order_id: String,
    pub short_id: String,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub lines: Vec<OrderCardLine>,
    pub total: Decimal,
    pub table_number: u32,
    pub created_at: String,
    pub note: Option<String>,
    pub user: Option<OrderCardUser>,
    /// Accept control shown (staff view, still pending)
    pub can_accept: bool,
}

pub fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Pending",
        OrderStatus::Accepted => "Accepted",
    }
}

impl OrderCard {
    /// Card for the customer's own order list
    pub fn customer(order: &Order, tz: Tz) -> Self {
        Self::build(order, tz, false)
    }

    /// Card for the staff queue, with user info and accept control
    pub fn staff(order: &Order, tz: Tz) -> Self {
        Self::build(order, tz, true)
    }

    fn build(order: &Order, tz: Tz, staff: bool) -> Self {
        let created_at = order
            .created_at
            .map(|t| t.with_timezone(&tz).format("%d.%m.%Y, %H:%M:%S").to_string())
            .unwrap_or_else(|| JUST_NOW.to_string());
        Self {
            order_id: order.id.clone(),
            short_id: order.short_id().to_string(),
            status: order.status,
            status_label: status_label(order.status),
            lines: order
                .items
                .iter()
                .map(|item| OrderCardLine {
                    name: item.name.clone(),
                    quantity: item.quantity,
                    price: item.price,
                    line_total: item.line_total(),
                })
                .collect(),
            // 使用下单时保存的总额
            total: order.total,
            table_number: order.table_number,
            created_at,
            note: order.note.clone().filter(|n| !n.trim().is_empty()),
            user: staff.then(|| OrderCardUser {
                name: order.user_label().to_string(),
                email: order.user_email.clone(),
            }),
            can_accept: staff && order.is_pending(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::models::OrderItem;

    fn sample() -> Order {
        Order {
            id: "XyZ12345".to_string(),
            user_id: "u1".to_string(),
            user_name: Some("Anna".to_string()),
            user_email: Some("anna@example.com".to_string()),
            table_number: 4,
            items: vec![
                OrderItem {
                    name: "Pizza Margherita".to_string(),
                    price: Decimal::from(25),
                    quantity: 1,
                },
                OrderItem {
                    name: "Coca Cola".to_string(),
                    price: Decimal::from(8),
                    quantity: 2,
                },
            ],
            // 故意与明细不同: 卡片显示存储的总额
            total: Decimal::from(40),
            note: Some("no onions".to_string()),
            status: OrderStatus::Pending,
            created_at: Some(Utc.with_ymd_and_hms(2026, 10, 19, 10, 30, 0).unwrap()),
            accepted_at: None,
            accepted_by: None,
        }
    }

    #[test]
    fn test_customer_card() {
        let card = OrderCard::customer(&sample(), chrono_tz::Europe::Warsaw);
        assert_eq!(card.short_id, "XyZ123");
        assert_eq!(card.status_label, "Pending");
        assert_eq!(card.lines[1].line_total, Decimal::from(16));
        assert_eq!(card.total, Decimal::from(40));
        assert_eq!(card.table_number, 4);
        assert_eq!(card.created_at, "19.10.2026, 12:30:00");
        assert_eq!(card.note.as_deref(), Some("no onions"));
        assert!(card.user.is_none());
        assert!(!card.can_accept);
    }

    #[test]
    fn test_staff_card() {
        let mut order = sample();
        let card = OrderCard::staff(&order, chrono_tz::UTC);
        assert_eq!(card.user.as_ref().unwrap().name, "Anna");
        assert_eq!(
            card.user.as_ref().unwrap().email.as_deref(),
            Some("anna@example.com")
        );
        assert!(card.can_accept);

        order.status = OrderStatus::Accepted;
        order.created_at = None;
        let card = OrderCard::staff(&order, chrono_tz::UTC);
        assert!(!card.can_accept);
        assert_eq!(card.created_at, JUST_NOW);
    }
}
