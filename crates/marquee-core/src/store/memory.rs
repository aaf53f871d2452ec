//! In-memory store
//!
//! Ephemeral `ContentStore` used by tests and local previews. Documents live
//! in a per-collection vector, so within a collection the unsorted query
//! order happens to be insertion order. Callers must not rely on that; any
//! meaningful order needs an explicit sort constraint.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{allocate_id, ChangeEvent, ContentStore, CHANGE_FEED_CAPACITY};
use crate::document::{merge_fields, Document, FieldMap};
use crate::error::{StoreError, StoreResult};
use crate::query::Query;

/// Ephemeral in-memory document store
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<(String, FieldMap)>>>,
    events: broadcast::Sender<ChangeEvent>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self {
            collections: RwLock::new(HashMap::new()),
            events,
        }
    }

    fn emit(&self, event: ChangeEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn load(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let collections = self.collections.read().map_err(|_| StoreError::Closed)?;
        Ok(collections.get(collection).and_then(|docs| {
            docs.iter()
                .find(|(doc_id, _)| doc_id == id)
                .map(|(doc_id, fields)| Document::new(doc_id.clone(), fields.clone()))
        }))
    }

    async fn run_query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        let collections = self.collections.read().map_err(|_| StoreError::Closed)?;
        let candidates = collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default();
        Ok(query.apply(candidates))
    }

    async fn create(&self, collection: &str, fields: FieldMap) -> StoreResult<String> {
        let id = allocate_id();
        {
            let mut collections = self.collections.write().map_err(|_| StoreError::Closed)?;
            collections
                .entry(collection.to_string())
                .or_default()
                .push((id.clone(), fields));
        }
        self.emit(ChangeEvent::written(collection, &id));
        Ok(id)
    }

    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: FieldMap,
        merge: bool,
    ) -> StoreResult<()> {
        {
            let mut collections = self.collections.write().map_err(|_| StoreError::Closed)?;
            let docs = collections.entry(collection.to_string()).or_default();
            match docs.iter().position(|(doc_id, _)| doc_id == id) {
                Some(pos) if merge => merge_fields(&mut docs[pos].1, &fields),
                Some(pos) => docs[pos].1 = fields,
                None => docs.push((id.to_string(), fields)),
            }
        }
        self.emit(ChangeEvent::written(collection, id));
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: FieldMap) -> StoreResult<()> {
        {
            let mut collections = self.collections.write().map_err(|_| StoreError::Closed)?;
            let existing = collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|(doc_id, _)| doc_id == id))
                .ok_or_else(|| StoreError::DocumentMissing {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })?;
            merge_fields(&mut existing.1, &fields);
        }
        self.emit(ChangeEvent::written(collection, id));
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()> {
        let removed = {
            let mut collections = self.collections.write().map_err(|_| StoreError::Closed)?;
            match collections.get_mut(collection) {
                Some(docs) => {
                    let before = docs.len();
                    docs.retain(|(doc_id, _)| doc_id != id);
                    docs.len() != before
                }
                None => false,
            }
        };
        if removed {
            self.emit(ChangeEvent::removed(collection, id));
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }
}
