//! Views and render routing
//!
//! Mirrors are updated by their subscription task regardless of which view is
//! showing. Only the active view is asked to re-render; an inactive view
//! renders from current mirror state when it is switched to.

use crate::orders::OrderScope;
use parking_lot::RwLock;
use serde::Serialize;
use shared::models::Role;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Admin panel selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AdminPanel {
    Customer,
    Waiter,
    MenuManagement,
    Announcements,
}

/// A renderable view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum View {
    CustomerMenu,
    CustomerOrders,
    WaiterQueue,
    AdminCustomerMenu,
    AdminCustomerOrders,
    AdminWaiter,
    AdminMenuManagement,
    AdminAnnouncements,
}

/// What changed in the mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataKind {
    Catalog,
    Kitchen,
    Cart,
    Orders,
    Announcements,
}

impl View {
    /// View shown right after login
    pub fn home(role: Role) -> Self {
        match role {
            Role::Customer => View::CustomerMenu,
            Role::Waiter => View::WaiterQueue,
            Role::Admin => View::AdminCustomerMenu,
        }
    }

    pub fn allowed_for(&self, role: Role) -> bool {
        match self {
            View::CustomerMenu | View::CustomerOrders => role == Role::Customer,
            View::WaiterQueue => role == Role::Waiter,
            _ => role == Role::Admin,
        }
    }

    /// Admin panel this view belongs to
    pub fn admin_panel(&self) -> Option<AdminPanel> {
        match self {
            View::AdminCustomerMenu | View::AdminCustomerOrders => Some(AdminPanel::Customer),
            View::AdminWaiter => Some(AdminPanel::Waiter),
            View::AdminMenuManagement => Some(AdminPanel::MenuManagement),
            View::AdminAnnouncements => Some(AdminPanel::Announcements),
            _ => None,
        }
    }

    /// Customer-facing menu (plain customer or admin acting as customer)
    pub fn is_customer_menu(&self) -> bool {
        matches!(self, View::CustomerMenu | View::AdminCustomerMenu)
    }

    /// Staff order management (waiter or admin acting as waiter)
    pub fn is_staff(&self) -> bool {
        matches!(self, View::WaiterQueue | View::AdminWaiter)
    }

    /// Order feed this view needs
    pub fn order_scope(&self, user_id: &str) -> Option<OrderScope> {
        match self {
            View::CustomerMenu
            | View::CustomerOrders
            | View::AdminCustomerMenu
            | View::AdminCustomerOrders => Some(OrderScope::Own {
                user_id: user_id.to_string(),
            }),
            View::WaiterQueue | View::AdminWaiter => Some(OrderScope::All),
            View::AdminMenuManagement | View::AdminAnnouncements => None,
        }
    }

    pub fn depends_on(&self, kind: DataKind) -> bool {
        match kind {
            DataKind::Catalog => self.is_customer_menu() || *self == View::AdminMenuManagement,
            DataKind::Kitchen | DataKind::Cart => self.is_customer_menu(),
            DataKind::Orders => matches!(
                self,
                View::CustomerOrders
                    | View::AdminCustomerOrders
                    | View::WaiterQueue
                    | View::AdminWaiter
            ),
            DataKind::Announcements => *self != View::AdminMenuManagement,
        }
    }
}

impl AdminPanel {
    /// Default view of the panel
    pub fn view(&self) -> View {
        match self {
            AdminPanel::Customer => View::AdminCustomerMenu,
            AdminPanel::Waiter => View::AdminWaiter,
            AdminPanel::MenuManagement => View::AdminMenuManagement,
            AdminPanel::Announcements => View::AdminAnnouncements,
        }
    }
}

/// Notification for the UI shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Re-render this (active) view from current state
    Render(View),
    /// Kitchen flag changed; the warning banner is present iff closed
    KitchenStatus { open: bool, banner: bool },
    /// Session ended
    LoggedOut,
}

/// Tracks the active view and emits render requests
#[derive(Debug, Clone)]
pub struct ViewRouter {
    active: Arc<RwLock<View>>,
    events: broadcast::Sender<SessionEvent>,
}

impl ViewRouter {
    pub fn new(initial: View, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        Self {
            active: Arc::new(RwLock::new(initial)),
            events,
        }
    }

    pub fn active(&self) -> View {
        *self.active.read()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Switch views and render the new one from current state
    pub fn set_active(&self, view: View) {
        *self.active.write() = view;
        self.emit(SessionEvent::Render(view));
    }

    /// A mirror changed; re-render the active view if it shows that data
    pub fn data_changed(&self, kind: DataKind) {
        let view = self.active();
        if view.depends_on(kind) {
            self.emit(SessionEvent::Render(view));
        }
    }

    pub fn kitchen_changed(&self, open: bool) {
        self.emit(SessionEvent::KitchenStatus {
            open,
            banner: !open,
        });
        self.data_changed(DataKind::Kitchen);
    }

    pub fn emit(&self, event: SessionEvent) {
        // 没有订阅者时忽略
        let _ = self.events.send(event);
    }
}
