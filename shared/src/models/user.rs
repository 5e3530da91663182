//! User Profile Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// User role
///
/// Set out-of-band; unknown values resolve to `Customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Waiter,
    Admin,
    #[default]
    #[serde(other)]
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Waiter => "waiter",
            Role::Admin => "admin",
        }
    }

    /// Waiter or admin
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Waiter | Role::Admin)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User profile (`users/{uid}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    /// Append-only; may contain duplicates, use [`UserProfile::read_set`]
    #[serde(default)]
    pub read_announcements: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Acknowledged announcement ids, deduplicated
    pub fn read_set(&self) -> BTreeSet<String> {
        self.read_announcements.iter().cloned().collect()
    }
}
