//! Shared types for the Bistro ordering client
//!
//! Data models mirrored from the remote document store, collection names
//! and the built-in seed menu. Used by `bistro-client` and by any UI shell
//! rendering its view models.

pub mod collections;
pub mod models;
pub mod seed;

// Re-exports
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
