//! Document store collection names and well-known document ids

pub const USERS: &str = "users";
pub const MENU: &str = "menu";
pub const ORDERS: &str = "orders";
pub const SETTINGS: &str = "settings";
pub const ANNOUNCEMENTS: &str = "announcements";

/// Singleton kitchen status document inside [`SETTINGS`]
pub const KITCHEN_DOC: &str = "kitchen";
