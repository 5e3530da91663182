//! Announcement Feed and read-state
//!
//! One global subscription, newest first. A user's read-set lives in their
//! profile document as an append-only array; it is deduplicated on every
//! read since the store's append is not trusted to do it.

use crate::error::{ClientResult, ValidationError};
use crate::store::{decode_snapshot, Direction, DocumentStore, Fields, Query, Snapshot};
use parking_lot::RwLock;
use shared::collections;
use shared::models::{Announcement, UserProfile};
use std::collections::BTreeSet;
use std::sync::Arc;

pub fn announcements_query() -> Query {
    Query::collection(collections::ANNOUNCEMENTS).order_by("createdAt", Direction::Descending)
}

/// Mirror of all announcements
#[derive(Debug, Clone, Default)]
pub struct AnnouncementFeed {
    items: Arc<RwLock<Vec<Announcement>>>,
}

impl AnnouncementFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_snapshot(&self, snapshot: &Snapshot) {
        *self.items.write() = decode_snapshot(collections::ANNOUNCEMENTS, snapshot);
    }

    /// Every announcement regardless of read state (admin management)
    pub fn all(&self) -> Vec<Announcement> {
        self.items.read().clone()
    }

    /// Announcements not in `read`
    pub fn unread(&self, read: &ReadState) -> Vec<Announcement> {
        self.items
            .read()
            .iter()
            .filter(|a| !read.contains(&a.id))
            .cloned()
            .collect()
    }
}

/// Mirror of the viewing user's read-set
#[derive(Debug, Clone, Default)]
pub struct ReadState {
    read: Arc<RwLock<BTreeSet<String>>>,
}

impl ReadState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a push of the user's own profile document
    pub fn apply_snapshot(&self, snapshot: &Snapshot) {
        if let Some(profile) = decode_snapshot::<UserProfile>(collections::USERS, snapshot)
            .into_iter()
            .next()
        {
            *self.read.write() = profile.read_set();
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.read.read().contains(id)
    }

    pub fn ids(&self) -> BTreeSet<String> {
        self.read.read().clone()
    }
}

/// Validated announcement waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingAnnouncement {
    message: String,
}

impl PendingAnnouncement {
    /// Trimmed, non-empty message
    pub fn new(message: &str) -> Result<Self, ValidationError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        Ok(Self {
            message: message.to_string(),
        })
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub async fn write_announcement(
    store: &dyn DocumentStore,
    pending: PendingAnnouncement,
    author_id: &str,
    author_name: Option<&str>,
) -> ClientResult<String> {
    let fields = Fields::new()
        .set("message", pending.message.as_str())
        .server_timestamp("createdAt")
        .set("authorId", author_id)
        .set("authorName", author_name);
    let id = store
        .add(collections::ANNOUNCEMENTS, fields)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "Failed to publish announcement"))?;
    tracing::info!(announcement_id = %id, "Announcement published");
    Ok(id)
}

pub async fn delete_announcement(store: &dyn DocumentStore, id: &str) -> ClientResult<()> {
    store
        .delete(collections::ANNOUNCEMENTS, id)
        .await
        .inspect_err(|e| tracing::error!(announcement_id = %id, error = %e, "Failed to delete announcement"))?;
    tracing::info!(announcement_id = %id, "Announcement deleted");
    Ok(())
}

/// Append `id` to the user's read-set
pub async fn write_read(store: &dyn DocumentStore, user_id: &str, id: &str) -> ClientResult<()> {
    store
        .update(
            collections::USERS,
            user_id,
            Fields::new().array_union("readAnnouncements", vec![serde_json::Value::from(id)]),
        )
        .await
        .inspect_err(|e| tracing::error!(user_id = %user_id, announcement_id = %id, error = %e, "Failed to mark announcement read"))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Document, ListenTarget, MemoryStore};
    use serde_json::json;

    fn doc(id: &str, value: serde_json::Value) -> Document {
        match value {
            serde_json::Value::Object(map) => Document::new(id, map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_pending_announcement_validation() {
        assert_eq!(
            PendingAnnouncement::new("   "),
            Err(ValidationError::EmptyMessage)
        );
        assert_eq!(
            PendingAnnouncement::new("  Happy hour at 5  ").unwrap().message(),
            "Happy hour at 5"
        );
    }

    #[test]
    fn test_unread_excludes_read_ids() {
        let feed = AnnouncementFeed::new();
        feed.apply_snapshot(&vec![
            doc("a2", json!({"message": "second"})),
            doc("a1", json!({"message": "first"})),
        ]);
        let read = ReadState::new();
        read.apply_snapshot(&vec![doc("u1", json!({"role": "customer", "readAnnouncements": ["a1", "a1"]}))]);

        let unread = feed.unread(&read);
        assert_eq!(unread.len(), 1);
        assert_eq!(unread[0].id, "a2");
        assert_eq!(feed.all().len(), 2);
        assert_eq!(read.ids().len(), 1);
    }

    #[tokio::test]
    async fn test_mark_read_twice_is_idempotent() {
        let store = MemoryStore::new();
        store.insert(collections::USERS, "u1", json!({"role": "customer", "readAnnouncements": []}));

        write_read(&store, "u1", "a1").await.unwrap();
        write_read(&store, "u1", "a1").await.unwrap();

        let read = ReadState::new();
        let mut listener = store.listen(ListenTarget::document(collections::USERS, "u1"));
        read.apply_snapshot(&listener.next().await.unwrap().unwrap());
        assert_eq!(read.ids().into_iter().collect::<Vec<_>>(), vec!["a1".to_string()]);
    }

    #[tokio::test]
    async fn test_write_announcement_fields() {
        let store = MemoryStore::new();
        let pending = PendingAnnouncement::new("Kitchen closes at 22:00").unwrap();
        let id = write_announcement(&store, pending, "admin1", Some("Boss"))
            .await
            .unwrap();
        let data = store.document(collections::ANNOUNCEMENTS, &id).unwrap();
        assert_eq!(data["message"], json!("Kitchen closes at 22:00"));
        assert_eq!(data["authorId"], json!("admin1"));
        assert!(data.contains_key("createdAt"));
    }
}
