//! Bistro Client - ordering and real-time sync layer
//!
//! Keeps the local cart and the live mirrors of the menu, kitchen status,
//! orders and announcements consistent with the remote document store.

pub mod announcements;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod kitchen;
pub mod logger;
pub mod orders;
pub mod prefs;
pub mod session;
pub mod store;
pub mod subscription;

pub use config::ClientConfig;
pub use error::{ClientError, ClientResult, ValidationError};
pub use session::{AdminPanel, Identity, Session, SessionEvent, SessionManager, View};
pub use store::{DocumentStore, MemoryStore, StoreError, StoreErrorCode};

// Re-export shared types for convenience
pub use shared::models::{
    Announcement, KitchenStatus, MenuCategory, MenuEntry, Order, OrderItem, OrderStatus, Role,
    UserProfile,
};
