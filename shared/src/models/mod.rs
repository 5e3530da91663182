//! Data models
//!
//! Mirrors of the remote document store collections. Field names follow the
//! store's camelCase convention; the document id is injected as `id` when a
//! document is decoded and is never written back as a field.

pub mod announcement;
pub mod kitchen;
pub mod menu;
pub mod order;
pub mod user;

// Re-exports
pub use announcement::*;
pub use kitchen::*;
pub use menu::*;
pub use order::*;
pub use user::*;
