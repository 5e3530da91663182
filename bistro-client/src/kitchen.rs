//! Kitchen Status Gate
//!
//! Singleton `settings/kitchen` flag. Food is orderable only while open.

use crate::error::ClientResult;
use crate::store::{decode_snapshot, DocumentStore, Fields, ListenTarget, Snapshot};
use parking_lot::RwLock;
use shared::collections;
use shared::models::KitchenStatus;
use std::sync::Arc;

pub fn kitchen_target() -> ListenTarget {
    ListenTarget::document(collections::SETTINGS, collections::KITCHEN_DOC)
}

/// Create the singleton with `open=true` if it does not exist
pub async fn ensure_seeded(store: &dyn DocumentStore) -> ClientResult<bool> {
    if store
        .get(collections::SETTINGS, collections::KITCHEN_DOC)
        .await?
        .is_some()
    {
        return Ok(false);
    }
    tracing::info!("Kitchen status missing, seeding open=true");
    store
        .set(
            collections::SETTINGS,
            collections::KITCHEN_DOC,
            Fields::new().set("open", true).server_timestamp("updatedAt"),
        )
        .await?;
    Ok(true)
}

/// Write the flipped flag; the mirror follows on the next push
pub async fn write_status(store: &dyn DocumentStore, open: bool) -> ClientResult<()> {
    store
        .update(
            collections::SETTINGS,
            collections::KITCHEN_DOC,
            Fields::new().set("open", open).server_timestamp("updatedAt"),
        )
        .await
        .inspect_err(|e| tracing::error!(open, error = %e, "Failed to update kitchen status"))?;
    tracing::info!(open, "Kitchen status updated");
    Ok(())
}

/// Mirror of the kitchen flag
///
/// Closed until the first snapshot carrying the document arrives.
#[derive(Debug, Clone, Default)]
pub struct KitchenGate {
    status: Arc<RwLock<Option<KitchenStatus>>>,
}

impl KitchenGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a pushed snapshot; returns the new flag if the document exists
    pub fn apply_snapshot(&self, snapshot: &Snapshot) -> Option<bool> {
        let status = decode_snapshot::<KitchenStatus>(collections::SETTINGS, snapshot)
            .into_iter()
            .next()?;
        let open = status.open;
        *self.status.write() = Some(status);
        Some(open)
    }

    pub fn is_open(&self) -> bool {
        self.status.read().as_ref().is_some_and(|s| s.open)
    }

    /// Last known status, `None` before the first push
    pub fn status(&self) -> Option<KitchenStatus> {
        self.status.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_seed_once() {
        let store = MemoryStore::new();
        assert!(ensure_seeded(&store).await.unwrap());
        assert!(!ensure_seeded(&store).await.unwrap());
        let doc = store
            .document(collections::SETTINGS, collections::KITCHEN_DOC)
            .unwrap();
        assert_eq!(doc["open"], json!(true));
        assert!(doc.contains_key("updatedAt"));
    }

    #[tokio::test]
    async fn test_existing_closed_kitchen_is_kept() {
        let store = MemoryStore::new();
        store.insert(collections::SETTINGS, collections::KITCHEN_DOC, json!({"open": false}));
        assert!(!ensure_seeded(&store).await.unwrap());

        let gate = KitchenGate::new();
        let mut listener = store.listen(kitchen_target());
        let snapshot = listener.next().await.unwrap().unwrap();
        assert_eq!(gate.apply_snapshot(&snapshot), Some(false));
        assert!(!gate.is_open());
    }

    #[test]
    fn test_closed_until_first_push() {
        let gate = KitchenGate::new();
        assert!(!gate.is_open());
        assert_eq!(gate.status(), None);
        assert_eq!(gate.apply_snapshot(&Vec::new()), None);
        assert!(!gate.is_open());
    }

    #[tokio::test]
    async fn test_missing_document_keeps_last_state() {
        let store = MemoryStore::new();
        ensure_seeded(&store).await.unwrap();
        let gate = KitchenGate::new();
        let mut listener = store.listen(kitchen_target());
        let snapshot = listener.next().await.unwrap().unwrap();
        assert_eq!(gate.apply_snapshot(&snapshot), Some(true));

        assert_eq!(gate.apply_snapshot(&Vec::new()), None);
        assert!(gate.is_open());
        assert!(gate.status().is_some_and(|s| s.open));
    }
}
