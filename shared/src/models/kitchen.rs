//! Kitchen Status Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kitchen status singleton (`settings/kitchen`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KitchenStatus {
    pub open: bool,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}
