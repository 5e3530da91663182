//! Staff order filtering
//!
//! Two independent client-side filters over the held snapshot: status and a
//! specific user. Changing a filter never touches the subscription.

use serde::Serialize;
use shared::models::{Order, OrderStatus};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Accepted,
}

impl StatusFilter {
    pub fn matches(&self, status: OrderStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => status == OrderStatus::Pending,
            StatusFilter::Accepted => status == OrderStatus::Accepted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum UserFilter {
    #[default]
    All,
    User(String),
}

impl UserFilter {
    pub fn matches(&self, user_id: &str) -> bool {
        match self {
            UserFilter::All => true,
            UserFilter::User(id) => id == user_id,
        }
    }
}

/// Current filter selection
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct OrderFilter {
    pub status: StatusFilter,
    pub user: UserFilter,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.status.matches(order.status) && self.user.matches(&order.user_id)
    }

    pub fn apply(&self, orders: &[Order]) -> Vec<Order> {
        orders.iter().filter(|o| self.matches(o)).cloned().collect()
    }

    /// Drop a user selection that is no longer among `options`
    pub fn reconcile(&mut self, options: &[UserOption]) {
        if let UserFilter::User(id) = &self.user
            && !options.iter().any(|o| &o.user_id == id)
        {
            tracing::debug!(user_id = %id, "Selected user left the snapshot, showing all users");
            self.user = UserFilter::All;
        }
    }

    pub fn empty_message(&self) -> EmptyMessage {
        match (self.status, &self.user) {
            (StatusFilter::All, UserFilter::All) => EmptyMessage::NoOrders,
            (status, UserFilter::All) => EmptyMessage::NoneWithStatus(status),
            (StatusFilter::All, UserFilter::User(_)) => EmptyMessage::NoneForUser,
            (status, UserFilter::User(_)) => EmptyMessage::NoneForUserWithStatus(status),
        }
    }
}

/// Entry of the user filter drop-down
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserOption {
    pub user_id: String,
    pub user_name: String,
}

/// Distinct (user id, name) pairs of a snapshot, sorted by name
pub fn user_options(orders: &[Order]) -> Vec<UserOption> {
    let mut by_id: BTreeMap<&str, &str> = BTreeMap::new();
    for order in orders {
        by_id.entry(&order.user_id).or_insert(order.user_label());
    }
    let mut options: Vec<UserOption> = by_id
        .into_iter()
        .map(|(id, name)| UserOption {
            user_id: id.to_string(),
            user_name: name.to_string(),
        })
        .collect();
    options.sort_by(|a, b| {
        a.user_name
            .to_lowercase()
            .cmp(&b.user_name.to_lowercase())
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    options
}

/// Empty-list message, one per filter combination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EmptyMessage {
    NoOrders,
    NoneWithStatus(StatusFilter),
    NoneForUser,
    NoneForUserWithStatus(StatusFilter),
}

fn status_word(status: StatusFilter) -> &'static str {
    match status {
        StatusFilter::Pending => "pending",
        StatusFilter::Accepted => "accepted",
        StatusFilter::All => "",
    }
}

impl fmt::Display for EmptyMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyMessage::NoOrders => f.write_str("No orders yet"),
            EmptyMessage::NoneWithStatus(s) => write!(f, "No {} orders", status_word(*s)),
            EmptyMessage::NoneForUser => f.write_str("No orders from the selected user"),
            EmptyMessage::NoneForUserWithStatus(s) => {
                write!(f, "No {} orders from the selected user", status_word(*s))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn order(id: &str, user: &str, name: &str, status: OrderStatus) -> Order {
        Order {
            id: id.to_string(),
            user_id: user.to_string(),
            user_name: Some(name.to_string()),
            user_email: None,
            table_number: 1,
            items: Vec::new(),
            total: Decimal::ZERO,
            note: None,
            status,
            created_at: None,
            accepted_at: None,
            accepted_by: None,
        }
    }

    fn snapshot() -> Vec<Order> {
        vec![
            order("o1", "u1", "Zofia", OrderStatus::Pending),
            order("o2", "u2", "Adam", OrderStatus::Accepted),
            order("o3", "u1", "Zofia", OrderStatus::Accepted),
            order("o4", "u3", "Marta", OrderStatus::Pending),
            order("o5", "u2", "Adam", OrderStatus::Pending),
        ]
    }

    fn ids(orders: &[Order]) -> Vec<&str> {
        orders.iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn test_status_filter() {
        let filter = OrderFilter {
            status: StatusFilter::Pending,
            user: UserFilter::All,
        };
        assert_eq!(ids(&filter.apply(&snapshot())), vec!["o1", "o4", "o5"]);
    }

    #[test]
    fn test_status_and_user_intersection() {
        let filter = OrderFilter {
            status: StatusFilter::Accepted,
            user: UserFilter::User("u2".to_string()),
        };
        assert_eq!(ids(&filter.apply(&snapshot())), vec!["o2"]);

        let filter = OrderFilter {
            status: StatusFilter::Accepted,
            user: UserFilter::User("u3".to_string()),
        };
        assert!(filter.apply(&snapshot()).is_empty());
        assert_eq!(
            filter.empty_message(),
            EmptyMessage::NoneForUserWithStatus(StatusFilter::Accepted)
        );
        assert_ne!(filter.empty_message(), EmptyMessage::NoOrders);
    }

    #[test]
    fn test_user_options_distinct_sorted() {
        let options = user_options(&snapshot());
        let names: Vec<&str> = options.iter().map(|o| o.user_name.as_str()).collect();
        assert_eq!(names, vec!["Adam", "Marta", "Zofia"]);
    }

    #[test]
    fn test_reconcile_drops_vanished_user() {
        let mut filter = OrderFilter {
            status: StatusFilter::Pending,
            user: UserFilter::User("ghost".to_string()),
        };
        filter.reconcile(&user_options(&snapshot()));
        assert_eq!(filter.user, UserFilter::All);
        assert_eq!(filter.status, StatusFilter::Pending);

        let mut filter = OrderFilter {
            status: StatusFilter::All,
            user: UserFilter::User("u1".to_string()),
        };
        filter.reconcile(&user_options(&snapshot()));
        assert_eq!(filter.user, UserFilter::User("u1".to_string()));
    }

    #[test]
    fn test_empty_messages_are_distinct() {
        let combos = [
            OrderFilter::default(),
            OrderFilter {
                status: StatusFilter::Pending,
                user: UserFilter::All,
            },
            OrderFilter {
                status: StatusFilter::All,
                user: UserFilter::User("u1".to_string()),
            },
            OrderFilter {
                status: StatusFilter::Pending,
                user: UserFilter::User("u1".to_string()),
            },
        ];
        let texts: Vec<String> = combos.iter().map(|f| f.empty_message().to_string()).collect();
        for (i, a) in texts.iter().enumerate() {
            for b in &texts[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(texts[0], "No orders yet");
    }
}
