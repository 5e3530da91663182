//! Order Feed
//!
//! Role-scoped live mirror of the orders collection.
//!
//! ```text
//! Own { user_id }: where userId == uid, createdAt desc  (newest first)
//! All:             createdAt asc                         (oldest pending first)
//!
//! listen(sorted) ──ok──▶ replace snapshot ──▶ rebuild user options ──▶ reconcile filter
//!       │
//!       └─ missing index ─▶ listen(unsorted) + client-side sort (missing createdAt = 0)
//! ```
//!
//! The fallback is silent for the caller: only a warning is logged.

pub mod card;
pub mod filter;

pub use card::{OrderCard, OrderCardLine, OrderCardUser};
pub use filter::{EmptyMessage, OrderFilter, StatusFilter, UserFilter, UserOption};

use crate::error::ClientResult;
use crate::session::view::{DataKind, ViewRouter};
use crate::store::{decode_snapshot, Direction, DocumentStore, Fields, Query, Snapshot};
use crate::subscription::Subscription;
use parking_lot::RwLock;
use shared::collections;
use shared::models::{Order, OrderStatus};
use std::sync::Arc;

/// Which orders a feed mirrors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderScope {
    /// Orders placed by this user
    Own { user_id: String },
    /// Every order (staff queue)
    All,
}

impl OrderScope {
    pub fn direction(&self) -> Direction {
        match self {
            OrderScope::Own { .. } => Direction::Descending,
            OrderScope::All => Direction::Ascending,
        }
    }

    /// Filtered query without sort
    pub fn unsorted_query(&self) -> Query {
        let query = Query::collection(collections::ORDERS);
        match self {
            OrderScope::Own { user_id } => query.where_eq("userId", user_id.as_str()),
            OrderScope::All => query,
        }
    }

    pub fn sorted_query(&self) -> Query {
        self.unsorted_query().order_by("createdAt", self.direction())
    }
}

/// Sort by creation time; a missing timestamp counts as 0
pub fn sort_by_created(orders: &mut [Order], direction: Direction) {
    match direction {
        Direction::Ascending => orders.sort_by_key(|o| o.created_at_key()),
        Direction::Descending => orders.sort_by_key(|o| std::cmp::Reverse(o.created_at_key())),
    }
}

#[derive(Debug, Default)]
struct FeedState {
    /// Latest unfiltered snapshot
    orders: Vec<Order>,
    user_options: Vec<UserOption>,
    filter: OrderFilter,
    fallback: bool,
    loaded: bool,
    /// Bumped on every reset; pushes from an older feed task are dropped
    generation: u64,
}

/// Mirror of the orders visible to the active view
#[derive(Debug, Clone, Default)]
pub struct OrderFeed {
    state: Arc<RwLock<FeedState>>,
}

impl OrderFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the snapshot; sorts client-side when `client_sort` is given
    pub fn apply_snapshot(&self, snapshot: &Snapshot, client_sort: Option<Direction>) {
        let generation = self.generation();
        self.apply_generation(generation, snapshot, client_sort);
    }

    /// Replace the snapshot if `generation` is still current
    ///
    /// Returns false when the push came from a feed that was reset since.
    pub(crate) fn apply_generation(
        &self,
        generation: u64,
        snapshot: &Snapshot,
        client_sort: Option<Direction>,
    ) -> bool {
        let mut orders: Vec<Order> = decode_snapshot(collections::ORDERS, snapshot);
        if let Some(direction) = client_sort {
            sort_by_created(&mut orders, direction);
        }
        let options = filter::user_options(&orders);

        let mut state = self.state.write();
        if state.generation != generation {
            return false;
        }
        state.filter.reconcile(&options);
        state.user_options = options;
        state.orders = orders;
        state.loaded = true;
        true
    }

    /// Forget everything (scope change); returns the new generation
    pub fn reset(&self) -> u64 {
        let mut state = self.state.write();
        let generation = state.generation + 1;
        let filter = std::mem::take(&mut state.filter);
        *state = FeedState {
            filter,
            generation,
            ..FeedState::default()
        };
        generation
    }

    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Unfiltered snapshot
    pub fn all(&self) -> Vec<Order> {
        self.state.read().orders.clone()
    }

    /// Snapshot with the current filters applied
    pub fn visible(&self) -> Vec<Order> {
        let state = self.state.read();
        state.filter.apply(&state.orders)
    }

    pub fn get(&self, order_id: &str) -> Option<Order> {
        self.state
            .read()
            .orders
            .iter()
            .find(|o| o.id == order_id)
            .cloned()
    }

    pub fn user_options(&self) -> Vec<UserOption> {
        self.state.read().user_options.clone()
    }

    pub fn filter(&self) -> OrderFilter {
        self.state.read().filter.clone()
    }

    pub fn set_status_filter(&self, status: StatusFilter) {
        self.state.write().filter.status = status;
    }

    /// Select a user; an id not in the current options falls back to all users
    pub fn set_user_filter(&self, user: UserFilter) {
        let mut state = self.state.write();
        state.filter.user = user;
        let options = state.user_options.clone();
        state.filter.reconcile(&options);
    }

    pub fn empty_message(&self) -> EmptyMessage {
        self.state.read().filter.empty_message()
    }

    /// Whether the unsorted fallback subscription is in use
    pub fn fallback_active(&self) -> bool {
        self.state.read().fallback
    }

    /// At least one snapshot has arrived
    pub fn is_loaded(&self) -> bool {
        self.state.read().loaded
    }

    fn set_fallback(&self, generation: u64, fallback: bool) {
        let mut state = self.state.write();
        if state.generation == generation {
            state.fallback = fallback;
        }
    }
}

/// Start the feed subscription for `scope`, writing as `generation`
pub(crate) fn spawn_feed(
    store: Arc<dyn DocumentStore>,
    scope: OrderScope,
    feed: OrderFeed,
    generation: u64,
    router: ViewRouter,
) -> Subscription {
    Subscription::spawn("orders", move |token| async move {
        let mut listener = store.listen(scope.sorted_query().into());
        let mut client_sort: Option<Direction> = None;
        feed.set_fallback(generation, false);
        loop {
            let next = tokio::select! {
                biased;
                _ = token.cancelled() => break,
                next = listener.next() => next,
            };
            match next {
                Some(Ok(snapshot)) => {
                    if token.is_cancelled()
                        || !feed.apply_generation(generation, &snapshot, client_sort)
                    {
                        break;
                    }
                    tracing::debug!(scope = ?scope, orders = snapshot.len(), fallback = client_sort.is_some(), "Orders snapshot applied");
                    router.data_changed(DataKind::Orders);
                }
                Some(Err(e)) if e.is_missing_index() && client_sort.is_none() => {
                    tracing::warn!(scope = ?scope, error = %e, "Missing index, loading orders without sorting");
                    listener = store.listen(scope.unsorted_query().into());
                    client_sort = Some(scope.direction());
                    feed.set_fallback(generation, true);
                }
                Some(Err(e)) => {
                    tracing::error!(scope = ?scope, error = %e, "Orders subscription failed");
                    break;
                }
                None => break,
            }
        }
    })
}

/// Mark an order accepted by `staff_id`
///
/// Plain update, no compare-and-swap: two staff accepting at once both
/// succeed and the last write wins.
pub async fn write_accept(
    store: &dyn DocumentStore,
    order_id: &str,
    staff_id: &str,
) -> ClientResult<()> {
    store
        .update(
            collections::ORDERS,
            order_id,
            Fields::new()
                .set("status", OrderStatus::Accepted.as_str())
                .server_timestamp("acceptedAt")
                .set("acceptedBy", staff_id),
        )
        .await
        .inspect_err(|e| tracing::error!(order_id = %order_id, error = %e, "Failed to accept order"))?;
    tracing::info!(order_id = %order_id, staff_id = %staff_id, "Order accepted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Document;
    use serde_json::json;

    fn doc(id: &str, user: &str, status: &str, created: Option<&str>) -> Document {
        let mut value = json!({
            "userId": user,
            "userName": user.to_uppercase(),
            "tableNumber": 1,
            "items": [],
            "total": 0.0,
            "status": status,
        });
        if let Some(created) = created {
            value["createdAt"] = json!(created);
        }
        match value {
            serde_json::Value::Object(map) => Document::new(id, map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_scope_queries() {
        let own = OrderScope::Own {
            user_id: "u1".to_string(),
        };
        assert_eq!(own.direction(), Direction::Descending);
        assert!(own.sorted_query().composite_index().is_some());
        assert!(own.unsorted_query().order_by.is_empty());

        assert_eq!(OrderScope::All.direction(), Direction::Ascending);
        assert!(OrderScope::All.sorted_query().composite_index().is_none());
    }

    #[test]
    fn test_client_side_sort_descending_missing_last() {
        let feed = OrderFeed::new();
        feed.apply_snapshot(
            &vec![
                doc("old", "u1", "pending", Some("2026-10-19T10:00:00.000000Z")),
                doc("nots", "u1", "pending", None),
                doc("new", "u1", "pending", Some("2026-10-19T11:00:00.000000Z")),
            ],
            Some(Direction::Descending),
        );
        let ids: Vec<String> = feed.all().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["new", "old", "nots"]);
    }

    #[test]
    fn test_client_side_sort_ascending() {
        let feed = OrderFeed::new();
        feed.apply_snapshot(
            &vec![
                doc("b", "u1", "pending", Some("2026-10-19T11:00:00.000000Z")),
                doc("a", "u2", "pending", Some("2026-10-19T10:00:00.000000Z")),
            ],
            Some(Direction::Ascending),
        );
        let ids: Vec<String> = feed.all().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_filter_survives_snapshots_and_resets_on_vanished_user() {
        let feed = OrderFeed::new();
        feed.apply_snapshot(
            &vec![
                doc("o1", "u1", "pending", None),
                doc("o2", "u2", "accepted", None),
            ],
            None,
        );
        feed.set_user_filter(UserFilter::User("u2".to_string()));
        feed.set_status_filter(StatusFilter::Accepted);
        assert_eq!(feed.visible().len(), 1);

        // u2 disappears from the next snapshot
        feed.apply_snapshot(&vec![doc("o1", "u1", "pending", None)], None);
        assert_eq!(feed.filter().user, UserFilter::All);
        assert_eq!(feed.filter().status, StatusFilter::Accepted);
        assert!(feed.visible().is_empty());
        assert_eq!(
            feed.empty_message(),
            EmptyMessage::NoneWithStatus(StatusFilter::Accepted)
        );
    }

    #[test]
    fn test_stale_generation_is_dropped() {
        let feed = OrderFeed::new();
        let staff = feed.reset();
        assert!(feed.apply_generation(staff, &vec![doc("o2", "u2", "pending", None)], None));

        let own = feed.reset();
        assert!(!feed.is_loaded());
        assert!(feed.apply_generation(own, &vec![doc("o1", "u1", "pending", None)], None));

        // 旧作用域的推送晚到, 不得覆盖新作用域
        assert!(!feed.apply_generation(
            staff,
            &vec![doc("o1", "u1", "pending", None), doc("o2", "u2", "pending", None)],
            None,
        ));
        let ids: Vec<String> = feed.all().into_iter().map(|o| o.id).collect();
        assert_eq!(ids, vec!["o1"]);
    }

    #[test]
    fn test_unknown_user_selection_falls_back() {
        let feed = OrderFeed::new();
        feed.apply_snapshot(&vec![doc("o1", "u1", "pending", None)], None);
        feed.set_user_filter(UserFilter::User("nobody".to_string()));
        assert_eq!(feed.filter().user, UserFilter::All);
        assert_eq!(feed.visible().len(), 1);
    }
}
