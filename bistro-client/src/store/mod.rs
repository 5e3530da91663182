//! Document store contract
//!
//! The remote collection-oriented database is an external collaborator.
//! This module fixes the contract the client consumes from it:
//!
//! ```text
//! get / query ─────────▶ one-shot reads
//! add / set / update ──▶ writes (Fields may carry server-side sentinels)
//! delete
//! listen(target) ──────▶ Listener ──▶ full snapshot on every change
//!                                 └─▶ error (listener ends)
//! ```
//!
//! [`MemoryStore`] is a complete in-process implementation.

pub mod memory;

pub use memory::{MemoryStore, WriteKind};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Errors
// =============================================================================

/// Store error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Query needs an index that does not exist
    FailedPrecondition,
    PermissionDenied,
    NotFound,
    Unavailable,
    Internal,
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StoreErrorCode::FailedPrecondition => "failed-precondition",
            StoreErrorCode::PermissionDenied => "permission-denied",
            StoreErrorCode::NotFound => "not-found",
            StoreErrorCode::Unavailable => "unavailable",
            StoreErrorCode::Internal => "internal",
        };
        f.write_str(s)
    }
}

/// Error reported by the document store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct StoreError {
    pub code: StoreErrorCode,
    pub message: String,
}

impl StoreError {
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn failed_precondition(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::FailedPrecondition, message)
    }

    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::PermissionDenied, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::NotFound, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Unavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Internal, message)
    }

    /// A query failed because a required index is missing
    pub fn is_missing_index(&self) -> bool {
        self.code == StoreErrorCode::FailedPrecondition
            || self.message.to_lowercase().contains("index")
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// =============================================================================
// Documents and writes
// =============================================================================

/// A document as returned by reads and snapshots
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Decode into a model, injecting the document id as `id`
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let mut data = self.data.clone();
        data.insert("id".to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(data))
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }
}

/// Decode every document of a snapshot, skipping the ones that do not fit
pub fn decode_snapshot<T: DeserializeOwned>(collection: &str, docs: &[Document]) -> Vec<T> {
    docs.iter()
        .filter_map(|doc| match doc.decode::<T>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(collection = %collection, doc_id = %doc.id, error = %e, "Skipping undecodable document");
                None
            }
        })
        .collect()
}

/// A single field value in a write
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Value(Value),
    /// Resolved by the store to its own clock
    ServerTimestamp,
    /// Appends the values to an array field
    ArrayUnion(Vec<Value>),
}

/// Ordered partial field set for `add` / `set` / `update`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields(Vec<(String, FieldValue)>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.push((key.into(), FieldValue::Value(value.into())));
        self
    }

    pub fn server_timestamp(mut self, key: impl Into<String>) -> Self {
        self.0.push((key.into(), FieldValue::ServerTimestamp));
        self
    }

    pub fn array_union(mut self, key: impl Into<String>, values: Vec<Value>) -> Self {
        self.0.push((key.into(), FieldValue::ArrayUnion(values)));
        self
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, FieldValue)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for Fields {
    type Item = (String, FieldValue);
    type IntoIter = std::vec::IntoIter<(String, FieldValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

// =============================================================================
// Queries
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Equality-filtered, multi-field sorted query over one collection
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filters: Vec<(String, Value)>,
    pub order_by: Vec<(String, Direction)>,
}

impl Query {
    pub fn collection(name: impl Into<String>) -> Self {
        Self {
            collection: name.into(),
            filters: Vec::new(),
            order_by: Vec::new(),
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by.push((field.into(), direction));
        self
    }

    /// Fields a composite index must cover, or `None` if a single-field
    /// index is enough (no filter, or sort only on filtered fields)
    pub fn composite_index(&self) -> Option<Vec<String>> {
        if self.filters.is_empty() {
            return None;
        }
        let extra: Vec<&String> = self
            .order_by
            .iter()
            .map(|(f, _)| f)
            .filter(|f| !self.filters.iter().any(|(ff, _)| ff == *f))
            .collect();
        if extra.is_empty() {
            return None;
        }
        let mut fields: Vec<String> = self.filters.iter().map(|(f, _)| f.clone()).collect();
        fields.extend(extra.into_iter().cloned());
        Some(fields)
    }
}

/// What a listener watches
#[derive(Debug, Clone, PartialEq)]
pub enum ListenTarget {
    Query(Query),
    Document { collection: String, id: String },
}

impl ListenTarget {
    pub fn document(collection: impl Into<String>, id: impl Into<String>) -> Self {
        ListenTarget::Document {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn collection(&self) -> &str {
        match self {
            ListenTarget::Query(q) => &q.collection,
            ListenTarget::Document { collection, .. } => collection,
        }
    }
}

impl From<Query> for ListenTarget {
    fn from(query: Query) -> Self {
        ListenTarget::Query(query)
    }
}

// =============================================================================
// Listeners
// =============================================================================

/// Full result set of a live query
pub type Snapshot = Vec<Document>;
pub type SnapshotResult = StoreResult<Snapshot>;

/// Consumer side of a live subscription
///
/// Dropping the listener unsubscribes it.
#[derive(Debug)]
pub struct Listener {
    rx: mpsc::UnboundedReceiver<SnapshotResult>,
    cancel: CancellationToken,
}

/// Producer side of a live subscription, held by the store
#[derive(Debug, Clone)]
pub struct ListenerSink {
    tx: mpsc::UnboundedSender<SnapshotResult>,
    cancel: CancellationToken,
}

impl Listener {
    pub fn channel() -> (ListenerSink, Listener) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        (
            ListenerSink {
                tx,
                cancel: cancel.clone(),
            },
            Listener { rx, cancel },
        )
    }

    /// Next push, or `None` once unsubscribed or closed by the store
    pub async fn next(&mut self) -> Option<SnapshotResult> {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            msg = self.rx.recv() => msg,
        }
    }

    pub fn unsubscribe(&self) {
        self.cancel.cancel();
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

impl ListenerSink {
    /// Push a result; returns false if the consumer is gone
    pub fn send(&self, result: SnapshotResult) -> bool {
        if self.is_closed() {
            return false;
        }
        self.tx.send(result).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled() || self.tx.is_closed()
    }
}

// =============================================================================
// Store trait
// =============================================================================

/// Remote document database with live-query support
#[async_trait]
pub trait DocumentStore: Send + Sync + fmt::Debug {
    /// Read one document
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// One-shot query
    async fn query(&self, query: &Query) -> StoreResult<Vec<Document>>;

    /// Create a document with a store-assigned id
    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String>;

    /// Create or replace a document
    async fn set(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;

    /// Partial update of an existing document
    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Live subscription; the current snapshot is delivered first
    fn listen(&self, target: ListenTarget) -> Listener;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_index_detection() {
        assert!(StoreError::failed_precondition("no").is_missing_index());
        assert!(StoreError::internal("The query requires an index").is_missing_index());
        assert!(!StoreError::permission_denied("nope").is_missing_index());
    }

    #[test]
    fn test_composite_index_fields() {
        let q = Query::collection("orders")
            .where_eq("userId", "u1")
            .order_by("createdAt", Direction::Descending);
        assert_eq!(
            q.composite_index(),
            Some(vec!["userId".to_string(), "createdAt".to_string()])
        );

        let q = Query::collection("orders").order_by("createdAt", Direction::Ascending);
        assert_eq!(q.composite_index(), None);

        let q = Query::collection("orders").where_eq("userId", "u1");
        assert_eq!(q.composite_index(), None);
    }

    #[test]
    fn test_document_decode_injects_id() {
        #[derive(serde::Deserialize)]
        struct Named {
            id: String,
            name: String,
        }
        let mut data = Map::new();
        data.insert("name".into(), json!("Tea"));
        let doc = Document::new("m1", data);
        let named: Named = doc.decode().unwrap();
        assert_eq!(named.id, "m1");
        assert_eq!(named.name, "Tea");
    }

    #[tokio::test]
    async fn test_listener_unsubscribe_ends_stream() {
        let (sink, mut listener) = Listener::channel();
        assert!(sink.send(Ok(Vec::new())));
        assert!(matches!(listener.next().await, Some(Ok(_))));

        listener.unsubscribe();
        assert!(sink.is_closed());
        assert!(!sink.send(Ok(Vec::new())));
        assert!(listener.next().await.is_none());
    }

    #[tokio::test]
    async fn test_drop_closes_sink() {
        let (sink, listener) = Listener::channel();
        drop(listener);
        assert!(sink.is_closed());
    }
}
