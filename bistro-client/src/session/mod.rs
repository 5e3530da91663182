//! Session Context
//!
//! A [`Session`] lives from login to logout. It owns the resolved role, the
//! cart, every mirror and every subscription feeding them.
//!
//! ```text
//! Identity ─▶ resolve profile (users/{uid}) ─▶ role
//!                                               │
//!   ┌───────────────────────────────────────────┘
//!   ▼
//! catalog ─┐
//! kitchen ─┤ session-wide subscriptions (any role)
//! announce ┤
//! profile ─┘
//! orders ──── one feed, scoped by the active view (torn down on switch)
//! ```
//!
//! Subscriptions are spawned on the current tokio runtime; the methods that
//! switch views must be called from within it.

pub mod view;

pub use view::{AdminPanel, DataKind, SessionEvent, View, ViewRouter};

use crate::announcements::{self, AnnouncementFeed, PendingAnnouncement, ReadState};
use crate::cart::{Cart, CartLine};
use crate::catalog::{self, CatalogCache, MenuEntryDraft, MenuTile};
use crate::checkout::{self, OrderDraft};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult, ValidationError};
use crate::kitchen::{self, KitchenGate};
use crate::orders::{
    self, EmptyMessage, OrderCard, OrderFeed, OrderFilter, OrderScope, StatusFilter, UserFilter,
    UserOption,
};
use crate::prefs::{self, Preferences};
use crate::store::{DocumentStore, Fields, ListenTarget};
use crate::subscription::Subscription;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use shared::collections;
use shared::models::{Announcement, KitchenStatus, MenuCategory, MenuEntry, Order, Role, UserProfile};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Authenticated identity handed over by the identity provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub uid: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
            display_name: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }
}

/// Read `users/{uid}`, creating it with role customer on first login
pub async fn resolve_profile(
    store: &dyn DocumentStore,
    identity: &Identity,
) -> ClientResult<UserProfile> {
    if let Some(doc) = store.get(collections::USERS, &identity.uid).await? {
        return match doc.decode::<UserProfile>() {
            Ok(profile) => Ok(profile),
            Err(e) => {
                tracing::warn!(uid = %identity.uid, error = %e, "Unreadable user profile, treating as customer");
                Ok(new_profile(identity))
            }
        };
    }

    tracing::info!(uid = %identity.uid, "First login, creating customer profile");
    store
        .set(
            collections::USERS,
            &identity.uid,
            Fields::new()
                .set("email", identity.email.clone())
                .set("name", identity.display_name.clone())
                .set("role", Role::Customer.as_str())
                .set("readAnnouncements", Vec::<serde_json::Value>::new())
                .server_timestamp("createdAt"),
        )
        .await?;
    Ok(new_profile(identity))
}

fn new_profile(identity: &Identity) -> UserProfile {
    UserProfile {
        id: identity.uid.clone(),
        email: identity.email.clone(),
        name: identity.display_name.clone(),
        role: Role::Customer,
        read_announcements: Vec::new(),
        created_at: None,
    }
}

/// Live subscriptions of one session
#[derive(Debug, Default)]
struct Subscriptions {
    catalog: Option<Subscription>,
    kitchen: Option<Subscription>,
    announcements: Option<Subscription>,
    profile: Option<Subscription>,
    orders: Option<Subscription>,
    order_scope: Option<OrderScope>,
}

impl Subscriptions {
    fn cancel_mirrors(&mut self) {
        for sub in [
            self.catalog.take(),
            self.kitchen.take(),
            self.announcements.take(),
            self.profile.take(),
        ]
        .into_iter()
        .flatten()
        {
            sub.cancel();
        }
    }

    fn cancel_orders(&mut self) {
        if let Some(sub) = self.orders.take() {
            sub.cancel();
        }
        self.order_scope = None;
    }

    fn cancel_all(&mut self) {
        self.cancel_mirrors();
        self.cancel_orders();
    }
}

/// Holds an in-flight flag; released on drop, also when the future is dropped
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::AcqRel) {
            None
        } else {
            Some(Self(flag))
        }
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Session-scoped context
#[derive(Debug)]
pub struct Session {
    store: Arc<dyn DocumentStore>,
    prefs: Arc<dyn Preferences>,
    config: ClientConfig,
    identity: Identity,
    profile: UserProfile,
    catalog: CatalogCache,
    kitchen: KitchenGate,
    orders: OrderFeed,
    announcements: AnnouncementFeed,
    read_state: ReadState,
    cart: Mutex<Cart>,
    router: ViewRouter,
    subscriptions: Mutex<Subscriptions>,
    checkout_in_flight: AtomicBool,
    active: AtomicBool,
}

impl Session {
    /// Resolve the role, seed missing data and activate the role's subscriptions
    pub async fn start(
        store: Arc<dyn DocumentStore>,
        prefs: Arc<dyn Preferences>,
        identity: Identity,
        config: ClientConfig,
    ) -> ClientResult<Self> {
        let profile = resolve_profile(store.as_ref(), &identity).await?;
        let role = profile.role;
        let home = View::home(role);
        tracing::info!(uid = %identity.uid, role = %role, "Session starting");

        if let Err(e) = catalog::seed_if_empty(store.as_ref()).await {
            tracing::error!(error = %e, "Failed to seed menu");
        }
        if let Err(e) = kitchen::ensure_seeded(store.as_ref()).await {
            tracing::error!(error = %e, "Failed to seed kitchen status");
        }

        let session = Self {
            router: ViewRouter::new(home, config.event_capacity),
            store,
            prefs,
            config,
            identity,
            profile,
            catalog: CatalogCache::new(),
            kitchen: KitchenGate::new(),
            orders: OrderFeed::new(),
            announcements: AnnouncementFeed::new(),
            read_state: ReadState::new(),
            cart: Mutex::new(Cart::new()),
            subscriptions: Mutex::new(Subscriptions::default()),
            checkout_in_flight: AtomicBool::new(false),
            active: AtomicBool::new(true),
        };

        session.subscribe_mirrors();
        session.show(home)?;
        tracing::info!(uid = %session.identity.uid, view = ?home, "Session started");
        Ok(session)
    }

    // ========== Accessors ==========

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn role(&self) -> Role {
        self.profile.role
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Render requests and status changes for the UI shell
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.router.subscribe()
    }

    pub fn active_view(&self) -> View {
        self.router.active()
    }

    fn display_name(&self) -> Option<String> {
        self.identity
            .display_name
            .clone()
            .or_else(|| self.profile.name.clone())
            .or_else(|| self.email())
    }

    fn email(&self) -> Option<String> {
        self.identity
            .email
            .clone()
            .or_else(|| self.profile.email.clone())
    }

    fn ensure_active(&self) -> ClientResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(ClientError::NoSession)
        }
    }

    fn require(&self, allowed: bool, action: &str) -> ClientResult<()> {
        self.ensure_active()?;
        if allowed {
            Ok(())
        } else {
            tracing::warn!(uid = %self.identity.uid, role = %self.role(), action, "Action not permitted");
            Err(ClientError::forbidden(action))
        }
    }

    fn require_admin(&self, action: &str) -> ClientResult<()> {
        self.require(self.role().is_admin(), action)
    }

    fn require_staff(&self, action: &str) -> ClientResult<()> {
        self.require(self.role().is_staff(), action)
    }

    /// Customers and admins acting as customers own a cart
    fn require_cart(&self, action: &str) -> ClientResult<()> {
        self.require(self.role() != Role::Waiter, action)
    }

    // ========== Subscriptions and views ==========

    fn subscribe_mirrors(&self) {
        let mut subs = self.subscriptions.lock();
        subs.cancel_mirrors();

        let cache = self.catalog.clone();
        let router = self.router.clone();
        subs.catalog = Some(Subscription::mirror(
            "catalog",
            self.store.listen(catalog::catalog_query().into()),
            move |snapshot| {
                cache.apply_snapshot(&snapshot);
                router.data_changed(DataKind::Catalog);
            },
        ));

        let gate = self.kitchen.clone();
        let router = self.router.clone();
        subs.kitchen = Some(Subscription::mirror(
            "kitchen",
            self.store.listen(kitchen::kitchen_target()),
            move |snapshot| {
                if let Some(open) = gate.apply_snapshot(&snapshot) {
                    router.kitchen_changed(open);
                }
            },
        ));

        let feed = self.announcements.clone();
        let router = self.router.clone();
        subs.announcements = Some(Subscription::mirror(
            "announcements",
            self.store.listen(announcements::announcements_query().into()),
            move |snapshot| {
                feed.apply_snapshot(&snapshot);
                router.data_changed(DataKind::Announcements);
            },
        ));

        let read_state = self.read_state.clone();
        let router = self.router.clone();
        subs.profile = Some(Subscription::mirror(
            "profile",
            self.store
                .listen(ListenTarget::document(collections::USERS, &self.identity.uid)),
            move |snapshot| {
                read_state.apply_snapshot(&snapshot);
                router.data_changed(DataKind::Announcements);
            },
        ));
    }

    /// Swap the order feed when the scope changes; the old listener goes first
    fn switch_order_feed(&self, scope: Option<OrderScope>, force: bool) {
        let mut subs = self.subscriptions.lock();
        let running = subs.orders.as_ref().is_some_and(|s| s.is_running());
        if !force && subs.order_scope == scope && (scope.is_none() || running) {
            return;
        }
        subs.cancel_orders();
        let generation = self.orders.reset();
        if let Some(scope) = scope {
            tracing::debug!(scope = ?scope, generation, "Order feed switching");
            subs.orders = Some(orders::spawn_feed(
                self.store.clone(),
                scope.clone(),
                self.orders.clone(),
                generation,
                self.router.clone(),
            ));
            subs.order_scope = Some(scope);
        }
    }

    /// Make `view` active and render it from current mirror state
    pub fn show(&self, view: View) -> ClientResult<()> {
        self.require(view.allowed_for(self.role()), "show view")?;
        self.switch_order_feed(view.order_scope(&self.identity.uid), false);
        self.router.set_active(view);
        Ok(())
    }

    pub fn switch_admin_panel(&self, panel: AdminPanel) -> ClientResult<()> {
        self.require_admin("switch admin panel")?;
        self.show(panel.view())
    }

    /// Re-establish every listener (after a listener error or reconnect)
    pub fn resubscribe(&self) -> ClientResult<()> {
        self.ensure_active()?;
        tracing::info!(uid = %self.identity.uid, "Resubscribing all listeners");
        self.subscribe_mirrors();
        let view = self.active_view();
        self.switch_order_feed(view.order_scope(&self.identity.uid), true);
        self.router.set_active(view);
        Ok(())
    }

    /// Unsubscribe everything and empty the cart
    pub fn logout(&self) {
        if !self.active.swap(false, Ordering::AcqRel) {
            return;
        }
        self.subscriptions.lock().cancel_all();
        self.cart.lock().clear();
        self.orders.reset();
        self.router.emit(SessionEvent::LoggedOut);
        tracing::info!(uid = %self.identity.uid, "Session ended");
    }

    // ========== Menu and cart ==========

    /// Customer-facing menu tiles
    pub fn menu_tiles(&self) -> Vec<MenuTile> {
        let cart = self.cart.lock();
        self.catalog.tiles(self.kitchen.is_open(), &cart)
    }

    pub fn menu_entries(&self) -> Vec<MenuEntry> {
        self.catalog.entries()
    }

    pub fn kitchen_open(&self) -> bool {
        self.kitchen.is_open()
    }

    /// Last pushed kitchen status; `None` until the mirror has loaded
    pub fn kitchen_status(&self) -> Option<KitchenStatus> {
        self.kitchen.status()
    }

    /// Toggle an entry in the cart
    ///
    /// Selecting requires the entry to be orderable right now; deselecting is
    /// always allowed. Returns whether the entry is selected afterwards.
    pub fn select(&self, entry_id: &str) -> ClientResult<bool> {
        self.require_cart("select menu entry")?;
        let mut cart = self.cart.lock();
        if cart.remove(entry_id) {
            drop(cart);
            self.router.data_changed(DataKind::Cart);
            return Ok(false);
        }
        let entry = self
            .catalog
            .get(entry_id)
            .ok_or_else(|| ClientError::NotFound(format!("menu entry {}", entry_id)))?;
        if !entry.is_orderable(self.kitchen.is_open()) {
            return Err(ValidationError::NotOrderable(entry.name).into());
        }
        let selected = cart.toggle(&entry);
        drop(cart);
        self.router.data_changed(DataKind::Cart);
        Ok(selected)
    }

    pub fn increase(&self, entry_id: &str) -> ClientResult<bool> {
        self.require_cart("change quantity")?;
        let changed = self.cart.lock().increase(entry_id);
        if changed {
            self.router.data_changed(DataKind::Cart);
        }
        Ok(changed)
    }

    pub fn decrease(&self, entry_id: &str) -> ClientResult<bool> {
        self.require_cart("change quantity")?;
        let changed = self.cart.lock().decrease(entry_id);
        if changed {
            self.router.data_changed(DataKind::Cart);
        }
        Ok(changed)
    }

    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.cart.lock().lines().to_vec()
    }

    pub fn cart_total(&self) -> Decimal {
        self.cart.lock().total()
    }

    /// Remembered table number for the checkout form
    pub fn table_prefill(&self) -> Option<u32> {
        prefs::last_table_number(self.prefs.as_ref())
    }

    /// Submit the cart as a pending order
    ///
    /// The cart is cleared only after the store confirms the write.
    pub async fn checkout(&self, table: &str, note: Option<&str>) -> ClientResult<String> {
        self.require_cart("checkout")?;
        let _guard = InFlightGuard::acquire(&self.checkout_in_flight)
            .ok_or(ValidationError::CheckoutInProgress)?;
        self.submit_order(table, note).await
    }

    async fn submit_order(&self, table: &str, note: Option<&str>) -> ClientResult<String> {
        let draft = {
            let cart = self.cart.lock();
            let table = checkout::validate_checkout(self.kitchen.is_open(), table, &cart)
                .inspect_err(|e| tracing::debug!(error = %e, "Checkout rejected"))?;
            OrderDraft::new(
                self.identity.uid.as_str(),
                self.display_name(),
                self.email(),
                table,
                &cart,
                note,
            )
        };

        let order_id = self
            .store
            .add(collections::ORDERS, draft.to_fields())
            .await
            .inspect_err(|e| tracing::error!(uid = %self.identity.uid, error = %e, "Failed to place order"))?;

        self.cart.lock().clear();
        prefs::remember_table_number(self.prefs.as_ref(), draft.table_number.get());
        self.router.data_changed(DataKind::Cart);
        tracing::info!(
            order_id = %order_id,
            table = draft.table_number.get(),
            total = %draft.total,
            "Order placed"
        );
        Ok(order_id)
    }

    // ========== Orders ==========

    /// Orders of the current feed; staff views apply the filters
    pub fn orders(&self) -> Vec<Order> {
        if self.active_view().is_staff() {
            self.orders.visible()
        } else {
            self.orders.all()
        }
    }

    pub fn order_cards(&self) -> Vec<OrderCard> {
        let tz = self.config.timezone;
        let staff = self.active_view().is_staff();
        self.orders()
            .iter()
            .map(|order| {
                if staff {
                    OrderCard::staff(order, tz)
                } else {
                    OrderCard::customer(order, tz)
                }
            })
            .collect()
    }

    pub fn orders_fallback_active(&self) -> bool {
        self.orders.fallback_active()
    }

    /// The current feed has received its first snapshot
    pub fn orders_loaded(&self) -> bool {
        self.orders.is_loaded()
    }

    pub fn order_filter(&self) -> OrderFilter {
        self.orders.filter()
    }

    pub fn user_options(&self) -> Vec<UserOption> {
        self.orders.user_options()
    }

    pub fn set_status_filter(&self, status: StatusFilter) -> ClientResult<()> {
        self.require_staff("filter orders")?;
        self.orders.set_status_filter(status);
        self.router.data_changed(DataKind::Orders);
        Ok(())
    }

    pub fn set_user_filter(&self, user: UserFilter) -> ClientResult<()> {
        self.require_staff("filter orders")?;
        self.orders.set_user_filter(user);
        self.router.data_changed(DataKind::Orders);
        Ok(())
    }

    /// Message for an empty order list
    pub fn empty_message(&self) -> EmptyMessage {
        if self.active_view().is_staff() {
            self.orders.empty_message()
        } else {
            EmptyMessage::NoOrders
        }
    }

    /// Accept a pending order (staff only)
    ///
    /// Refused when the mirror already shows it accepted. This is advisory:
    /// the write itself is unconditional.
    pub async fn accept_order(&self, order_id: &str) -> ClientResult<()> {
        self.require_staff("accept order")?;
        let order = self
            .orders
            .get(order_id)
            .ok_or_else(|| ClientError::NotFound(format!("order {}", order_id)))?;
        if !order.is_pending() {
            return Err(ClientError::AlreadyAccepted(order_id.to_string()));
        }
        orders::write_accept(self.store.as_ref(), order_id, &self.identity.uid).await
    }

    // ========== Admin: menu and kitchen ==========

    pub async fn add_menu_entry(
        &self,
        name: &str,
        category: MenuCategory,
        price: &str,
    ) -> ClientResult<String> {
        self.require_admin("add menu entry")?;
        let draft = MenuEntryDraft::parse(name, category, price)?;
        catalog::add_entry(self.store.as_ref(), &draft).await
    }

    pub async fn edit_menu_entry(
        &self,
        entry_id: &str,
        name: &str,
        category: MenuCategory,
        price: &str,
    ) -> ClientResult<()> {
        self.require_admin("edit menu entry")?;
        let draft = MenuEntryDraft::parse(name, category, price)?;
        catalog::edit_entry(self.store.as_ref(), entry_id, &draft).await
    }

    /// Flip availability; returns the value written
    pub async fn toggle_availability(&self, entry_id: &str) -> ClientResult<bool> {
        self.require_admin("toggle availability")?;
        let entry = self
            .catalog
            .get(entry_id)
            .ok_or_else(|| ClientError::NotFound(format!("menu entry {}", entry_id)))?;
        let available = !entry.available;
        catalog::set_availability(self.store.as_ref(), entry_id, available).await?;
        Ok(available)
    }

    pub async fn delete_menu_entry(&self, entry_id: &str) -> ClientResult<()> {
        self.require_admin("delete menu entry")?;
        catalog::delete_entry(self.store.as_ref(), entry_id).await
    }

    /// Flip the kitchen flag; returns the value written
    pub async fn toggle_kitchen(&self) -> ClientResult<bool> {
        self.require_admin("toggle kitchen")?;
        let current = self
            .kitchen
            .status()
            .ok_or_else(|| ClientError::NotFound("kitchen status".to_string()))?;
        let open = !current.open;
        kitchen::write_status(self.store.as_ref(), open).await?;
        Ok(open)
    }

    // ========== Announcements ==========

    pub fn unread_announcements(&self) -> Vec<Announcement> {
        self.announcements.unread(&self.read_state)
    }

    /// Every announcement, read or not (admin management)
    pub fn all_announcements(&self) -> ClientResult<Vec<Announcement>> {
        self.require_admin("list announcements")?;
        Ok(self.announcements.all())
    }

    pub async fn mark_read(&self, announcement_id: &str) -> ClientResult<()> {
        self.ensure_active()?;
        announcements::write_read(self.store.as_ref(), &self.identity.uid, announcement_id).await
    }

    /// Validate a message; publishing it is a separate confirmation step
    pub fn prepare_announcement(&self, message: &str) -> ClientResult<PendingAnnouncement> {
        self.require_admin("create announcement")?;
        Ok(PendingAnnouncement::new(message)?)
    }

    pub async fn publish_announcement(&self, pending: PendingAnnouncement) -> ClientResult<String> {
        self.require_admin("create announcement")?;
        announcements::write_announcement(
            self.store.as_ref(),
            pending,
            &self.identity.uid,
            self.display_name().as_deref(),
        )
        .await
    }

    pub async fn delete_announcement(&self, announcement_id: &str) -> ClientResult<()> {
        self.require_admin("delete announcement")?;
        announcements::delete_announcement(self.store.as_ref(), announcement_id).await
    }
}

/// Follows the identity provider's auth state; at most one live session
#[derive(Debug)]
pub struct SessionManager {
    store: Arc<dyn DocumentStore>,
    prefs: Arc<dyn Preferences>,
    config: ClientConfig,
    current: tokio::sync::Mutex<Option<Arc<Session>>>,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        prefs: Arc<dyn Preferences>,
        config: ClientConfig,
    ) -> Self {
        Self {
            store,
            prefs,
            config,
            current: tokio::sync::Mutex::new(None),
        }
    }

    /// `Some(identity)` starts a session, `None` logs out
    pub async fn on_auth_state(
        &self,
        identity: Option<Identity>,
    ) -> ClientResult<Option<Arc<Session>>> {
        let mut current = self.current.lock().await;

        let Some(identity) = identity else {
            if let Some(session) = current.take() {
                session.logout();
            }
            return Ok(None);
        };

        if let Some(session) = current.as_ref()
            && session.is_active()
            && session.identity().uid == identity.uid
        {
            return Ok(Some(session.clone()));
        }
        if let Some(previous) = current.take() {
            previous.logout();
        }

        let session = Arc::new(
            Session::start(
                self.store.clone(),
                self.prefs.clone(),
                identity,
                self.config.clone(),
            )
            .await?,
        );
        *current = Some(session.clone());
        Ok(Some(session))
    }

    pub async fn current(&self) -> Option<Arc<Session>> {
        self.current.lock().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[test]
    fn test_in_flight_guard_releases_on_drop() {
        let flag = AtomicBool::new(false);
        let guard = InFlightGuard::acquire(&flag).unwrap();
        assert!(InFlightGuard::acquire(&flag).is_none());
        drop(guard);
        assert!(!flag.load(Ordering::Acquire));
        assert!(InFlightGuard::acquire(&flag).is_some());
    }

    #[tokio::test]
    async fn test_first_login_creates_customer_profile() {
        let store = MemoryStore::new();
        let identity = Identity::new("u1")
            .with_email("ala@example.com")
            .with_display_name("Ala");

        let profile = resolve_profile(&store, &identity).await.unwrap();
        assert_eq!(profile.role, Role::Customer);

        let data = store.document(collections::USERS, "u1").unwrap();
        assert_eq!(data["role"], json!("customer"));
        assert_eq!(data["email"], json!("ala@example.com"));
        assert_eq!(data["readAnnouncements"], json!([]));
        assert!(data.contains_key("createdAt"));
    }

    #[tokio::test]
    async fn test_existing_profile_role_is_read() {
        let store = MemoryStore::new();
        store.insert(collections::USERS, "w1", json!({"role": "waiter"}));
        store.insert(collections::USERS, "x1", json!({"role": "owner"}));

        let waiter = resolve_profile(&store, &Identity::new("w1")).await.unwrap();
        assert_eq!(waiter.role, Role::Waiter);
        let unknown = resolve_profile(&store, &Identity::new("x1")).await.unwrap();
        assert_eq!(unknown.role, Role::Customer);
        // 已存在的档案不会被覆盖
        assert_eq!(store.document(collections::USERS, "x1").unwrap()["role"], json!("owner"));
    }
}
