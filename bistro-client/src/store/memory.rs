//! In-process document store
//!
//! Behaves like the remote store as far as the client can observe:
//! store-assigned ids, monotonic server timestamps, full snapshot pushes to
//! every live listener after each write, and (optionally) composite index
//! enforcement. Array-union is a plain append; readers dedupe.

use super::{
    Direction, Document, DocumentStore, FieldValue, Fields, ListenTarget, Listener, ListenerSink,
    Query, Snapshot, StoreError, StoreResult,
};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Kind of write recorded in the write log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteKind {
    Add,
    Set,
    Update,
    Delete,
}

/// One successful write
#[derive(Debug, Clone, PartialEq)]
struct WriteRecord {
    kind: WriteKind,
    collection: String,
}

type Collection = BTreeMap<String, Map<String, Value>>;

#[derive(Debug, Default)]
struct Inner {
    collections: HashMap<String, Collection>,
    listeners: Vec<(ListenTarget, ListenerSink)>,
    enforce_indexes: bool,
    indexes: HashSet<(String, Vec<String>)>,
    fail_next_write: Option<StoreError>,
    last_timestamp: Option<DateTime<Utc>>,
    write_log: Vec<WriteRecord>,
}

/// In-memory [`DocumentStore`]
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject filtered+sorted queries that have no declared composite index
    pub fn enforce_composite_indexes(self, enforce: bool) -> Self {
        self.inner.lock().enforce_indexes = enforce;
        self
    }

    /// Declare a composite index (filter fields first, then sort fields)
    pub fn add_index(&self, collection: &str, fields: &[&str]) {
        let key = (
            collection.to_string(),
            fields.iter().map(|f| f.to_string()).collect(),
        );
        self.inner.lock().indexes.insert(key);
    }

    /// Make the next write fail with `error`
    pub fn fail_next_write(&self, error: StoreError) {
        self.inner.lock().fail_next_write = Some(error);
    }

    /// Deliver `error` to every live listener on `collection` and close them
    pub fn break_listeners(&self, collection: &str, error: StoreError) {
        let mut inner = self.inner.lock();
        inner.listeners.retain(|(target, sink)| {
            if target.collection() != collection {
                return true;
            }
            sink.send(Err(error.clone()));
            false
        });
    }

    /// Insert raw data, bypassing failure injection (test fixtures)
    pub fn insert(&self, collection: &str, id: &str, data: Value) {
        let mut inner = self.inner.lock();
        let map = match data {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), map);
        inner.notify(collection);
    }

    pub fn document(&self, collection: &str, id: &str) -> Option<Map<String, Value>> {
        self.inner
            .lock()
            .collections
            .get(collection)
            .and_then(|c| c.get(id))
            .cloned()
    }

    pub fn documents(&self, collection: &str) -> Vec<Document> {
        self.inner
            .lock()
            .collections
            .get(collection)
            .map(|c| {
                c.iter()
                    .map(|(id, data)| Document::new(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Successful writes of `kind` against `collection`
    pub fn write_count(&self, kind: WriteKind, collection: &str) -> usize {
        self.inner
            .lock()
            .write_log
            .iter()
            .filter(|w| w.kind == kind && w.collection == collection)
            .count()
    }

    /// Live listeners on `collection` (closed ones are pruned first)
    pub fn listener_count(&self, collection: &str) -> usize {
        let mut inner = self.inner.lock();
        inner.listeners.retain(|(_, sink)| !sink.is_closed());
        inner
            .listeners
            .iter()
            .filter(|(target, _)| target.collection() == collection)
            .count()
    }
}

impl Inner {
    fn take_failure(&mut self) -> StoreResult<()> {
        match self.fail_next_write.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Strictly increasing timestamp, microsecond precision
    fn next_timestamp(&mut self) -> Value {
        let mut now = Utc::now();
        if let Some(last) = self.last_timestamp
            && now <= last
        {
            now = last + chrono::Duration::microseconds(1);
        }
        self.last_timestamp = Some(now);
        Value::String(now.to_rfc3339_opts(SecondsFormat::Micros, true))
    }

    fn apply_fields(&mut self, target: &mut Map<String, Value>, fields: Fields) {
        for (key, value) in fields {
            let resolved = match value {
                FieldValue::Value(v) => v,
                FieldValue::ServerTimestamp => self.next_timestamp(),
                FieldValue::ArrayUnion(values) => {
                    let mut existing = match target.remove(&key) {
                        Some(Value::Array(items)) => items,
                        _ => Vec::new(),
                    };
                    existing.extend(values);
                    Value::Array(existing)
                }
            };
            target.insert(key, resolved);
        }
    }

    fn record(&mut self, kind: WriteKind, collection: &str) {
        self.write_log.push(WriteRecord {
            kind,
            collection: collection.to_string(),
        });
    }

    fn check_index(&self, query: &Query) -> StoreResult<()> {
        if !self.enforce_indexes {
            return Ok(());
        }
        match query.composite_index() {
            Some(fields) if !self.indexes.contains(&(query.collection.clone(), fields.clone())) => {
                Err(StoreError::failed_precondition(format!(
                    "The query requires an index on {} ({})",
                    query.collection,
                    fields.join(", ")
                )))
            }
            _ => Ok(()),
        }
    }

    fn run_query(&self, query: &Query) -> StoreResult<Snapshot> {
        self.check_index(query)?;
        let Some(collection) = self.collections.get(&query.collection) else {
            return Ok(Vec::new());
        };
        let mut docs: Vec<Document> = collection
            .iter()
            .filter(|(_, data)| {
                query
                    .filters
                    .iter()
                    .all(|(field, value)| data.get(field) == Some(value))
            })
            .map(|(id, data)| Document::new(id.clone(), data.clone()))
            .collect();

        docs.sort_by(|a, b| {
            for (field, direction) in &query.order_by {
                let ord = compare_values(a.get(field), b.get(field));
                let ord = match direction {
                    Direction::Ascending => ord,
                    Direction::Descending => ord.reverse(),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.id.cmp(&b.id)
        });
        Ok(docs)
    }

    fn evaluate(&self, target: &ListenTarget) -> StoreResult<Snapshot> {
        match target {
            ListenTarget::Query(query) => self.run_query(query),
            ListenTarget::Document { collection, id } => Ok(self
                .collections
                .get(collection)
                .and_then(|c| c.get(id))
                .map(|data| vec![Document::new(id.clone(), data.clone())])
                .unwrap_or_default()),
        }
    }

    /// Push a fresh snapshot to every live listener on `collection`
    fn notify(&mut self, collection: &str) {
        self.listeners.retain(|(_, sink)| !sink.is_closed());
        let pushes: Vec<(ListenerSink, StoreResult<Snapshot>)> = self
            .listeners
            .iter()
            .filter(|(target, _)| target.collection() == collection)
            .map(|(target, sink)| (sink.clone(), self.evaluate(target)))
            .collect();
        for (sink, result) in pushes {
            sink.send(result);
        }
    }
}

/// Ordering used for sorts: missing < null < bool < number < timestamp/string
fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    fn rank(v: Option<&Value>) -> u8 {
        match v {
            None => 0,
            Some(Value::Null) => 1,
            Some(Value::Bool(_)) => 2,
            Some(Value::Number(_)) => 3,
            Some(Value::String(_)) => 4,
            Some(Value::Array(_)) => 5,
            Some(Value::Object(_)) => 6,
        }
    }
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or_default();
            let y = y.as_f64().unwrap_or_default();
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => {
            match (
                DateTime::parse_from_rfc3339(x),
                DateTime::parse_from_rfc3339(y),
            ) {
                (Ok(tx), Ok(ty)) => tx.cmp(&ty),
                _ => x.cmp(y),
            }
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        Ok(self
            .document(collection, id)
            .map(|data| Document::new(id, data)))
    }

    async fn query(&self, query: &Query) -> StoreResult<Vec<Document>> {
        self.inner.lock().run_query(query)
    }

    async fn add(&self, collection: &str, fields: Fields) -> StoreResult<String> {
        let mut inner = self.inner.lock();
        inner.take_failure()?;
        let id = Uuid::new_v4().simple().to_string();
        let mut data = Map::new();
        inner.apply_fields(&mut data, fields);
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        inner.record(WriteKind::Add, collection);
        inner.notify(collection);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        inner.take_failure()?;
        let mut data = Map::new();
        inner.apply_fields(&mut data, fields);
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        inner.record(WriteKind::Set, collection);
        inner.notify(collection);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Fields) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        inner.take_failure()?;
        let Some(mut data) = inner
            .collections
            .get_mut(collection)
            .and_then(|c| c.remove(id))
        else {
            return Err(StoreError::not_found(format!(
                "No document to update: {}/{}",
                collection, id
            )));
        };
        inner.apply_fields(&mut data, fields);
        inner
            .collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), data);
        inner.record(WriteKind::Update, collection);
        inner.notify(collection);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        inner.take_failure()?;
        if let Some(c) = inner.collections.get_mut(collection) {
            c.remove(id);
        }
        inner.record(WriteKind::Delete, collection);
        inner.notify(collection);
        Ok(())
    }

    fn listen(&self, target: ListenTarget) -> Listener {
        let (sink, listener) = Listener::channel();
        let mut inner = self.inner.lock();
        match inner.evaluate(&target) {
            Ok(snapshot) => {
                sink.send(Ok(snapshot));
                inner.listeners.push((target, sink));
            }
            Err(error) => {
                tracing::debug!(collection = %target.collection(), error = %error, "Listener rejected");
                sink.send(Err(error));
            }
        }
        listener
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_add_and_sorted_query() {
        let store = MemoryStore::new();
        for (name, category) in [("Beer", "drink"), ("Pizza", "food"), ("Apple Juice", "drink")] {
            store
                .add(
                    "menu",
                    Fields::new().set("name", name).set("category", category),
                )
                .await
                .unwrap();
        }
        let query = Query::collection("menu")
            .order_by("category", Direction::Ascending)
            .order_by("name", Direction::Ascending);
        let names: Vec<String> = store
            .query(&query)
            .await
            .unwrap()
            .iter()
            .map(|d| d.get("name").and_then(|v| v.as_str()).unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Apple Juice", "Beer", "Pizza"]);
    }

    #[tokio::test]
    async fn test_listener_receives_initial_and_pushes() {
        let store = MemoryStore::new();
        let mut listener = store.listen(Query::collection("orders").into());
        assert_eq!(listener.next().await.unwrap().unwrap().len(), 0);

        store
            .add("orders", Fields::new().set("userId", "u1"))
            .await
            .unwrap();
        assert_eq!(listener.next().await.unwrap().unwrap().len(), 1);
        assert_eq!(store.listener_count("orders"), 1);

        drop(listener);
        assert_eq!(store.listener_count("orders"), 0);
    }

    #[tokio::test]
    async fn test_missing_index_rejects_listener() {
        let store = MemoryStore::new().enforce_composite_indexes(true);
        let query = Query::collection("orders")
            .where_eq("userId", "u1")
            .order_by("createdAt", Direction::Descending);

        let mut listener = store.listen(query.clone().into());
        let err = listener.next().await.unwrap().unwrap_err();
        assert!(err.is_missing_index());
        assert!(listener.next().await.is_none());

        store.add_index("orders", &["userId", "createdAt"]);
        let mut listener = store.listen(query.into());
        assert!(listener.next().await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_server_timestamps_are_monotonic() {
        let store = MemoryStore::new();
        let a = store
            .add("orders", Fields::new().server_timestamp("createdAt"))
            .await
            .unwrap();
        let b = store
            .add("orders", Fields::new().server_timestamp("createdAt"))
            .await
            .unwrap();
        let ta = store.document("orders", &a).unwrap()["createdAt"].clone();
        let tb = store.document("orders", &b).unwrap()["createdAt"].clone();
        assert_eq!(compare_values(Some(&ta), Some(&tb)), Ordering::Less);
    }

    #[tokio::test]
    async fn test_array_union_appends_naively() {
        let store = MemoryStore::new();
        store.insert("users", "u1", json!({"readAnnouncements": []}));
        for _ in 0..2 {
            store
                .update(
                    "users",
                    "u1",
                    Fields::new().array_union("readAnnouncements", vec![json!("a1")]),
                )
                .await
                .unwrap();
        }
        let doc = store.document("users", "u1").unwrap();
        assert_eq!(doc["readAnnouncements"], json!(["a1", "a1"]));
    }

    #[tokio::test]
    async fn test_fail_next_write_is_one_shot() {
        let store = MemoryStore::new();
        store.fail_next_write(StoreError::unavailable("offline"));
        assert!(store.add("orders", Fields::new()).await.is_err());
        assert!(store.add("orders", Fields::new()).await.is_ok());
        assert_eq!(store.write_count(WriteKind::Add, "orders"), 1);
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryStore::new();
        let err = store
            .update("orders", "nope", Fields::new().set("status", "accepted"))
            .await
            .unwrap_err();
        assert_eq!(err.code, super::super::StoreErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_document_listener_and_break() {
        let store = MemoryStore::new();
        let mut listener = store.listen(ListenTarget::document("settings", "kitchen"));
        assert!(listener.next().await.unwrap().unwrap().is_empty());

        store.insert("settings", "kitchen", json!({"open": true}));
        assert_eq!(listener.next().await.unwrap().unwrap().len(), 1);

        store.break_listeners("settings", StoreError::unavailable("lost"));
        assert!(listener.next().await.unwrap().is_err());
        assert!(listener.next().await.is_none());
    }
}
