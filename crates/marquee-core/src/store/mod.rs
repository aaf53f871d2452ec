//! Backing document store interface
//!
//! The content layer is a façade over a document store that offers exactly
//! four primitives: load a document, run a query, write (create/set/update/
//! remove), and a change feed. Everything above this trait (bindings, the
//! write facade, section typing) is store-agnostic.
//!
//! Two implementations ship with the crate:
//! - [`MemoryStore`]: ephemeral, for tests and previews
//! - [`SqliteStore`]: durable local content for the admin CLI

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::broadcast;

use crate::document::{Document, FieldMap};
use crate::error::StoreResult;
use crate::query::Query;

/// Capacity of the change feed
///
/// A lagged subscriber re-reads the store instead of replaying missed
/// events, so the buffer only needs to absorb short bursts.
pub(crate) const CHANGE_FEED_CAPACITY: usize = 256;

/// What happened to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Created, replaced, or merged
    Written,
    /// Deleted
    Removed,
}

/// A change notification from the store
///
/// Events are emitted in commit order, after the write is durable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: String,
    pub id: String,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub(crate) fn written(collection: &str, id: &str) -> Self {
        Self {
            collection: collection.to_string(),
            id: id.to_string(),
            kind: ChangeKind::Written,
        }
    }

    pub(crate) fn removed(collection: &str, id: &str) -> Self {
        Self {
            collection: collection.to_string(),
            id: id.to_string(),
            kind: ChangeKind::Removed,
        }
    }

    /// Whether this event concerns one specific document
    pub fn concerns(&self, collection: &str, id: &str) -> bool {
        self.collection == collection && self.id == id
    }

    /// Whether this event falls inside a collection
    pub fn in_collection(&self, collection: &str) -> bool {
        self.collection == collection
    }
}

/// The backing document store primitives
///
/// Write semantics:
/// - `create` allocates a fresh document id and persists the fields as given
/// - `set` with `merge = false` replaces the whole document (fields not in
///   the payload are gone afterwards); with `merge = true` it merges the
///   payload into the existing fields, creating the document if absent
/// - `update` merges like `set(merge = true)` but fails with
///   [`StoreError::DocumentMissing`] if the document does not exist
/// - `remove` is idempotent; removing an absent document succeeds
///
/// None of the operations retry; retry is a caller concern.
///
/// [`StoreError::DocumentMissing`]: crate::error::StoreError::DocumentMissing
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Load one document, `None` if it does not exist
    async fn load(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Run a query over one collection
    async fn run_query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>>;

    /// Create a new document, returning its allocated id
    async fn create(&self, collection: &str, fields: FieldMap) -> StoreResult<String>;

    /// Replace (`merge = false`) or merge-upsert (`merge = true`) a document
    async fn set(&self, collection: &str, id: &str, fields: FieldMap, merge: bool)
        -> StoreResult<()>;

    /// Merge fields into an existing document
    async fn update(&self, collection: &str, id: &str, fields: FieldMap) -> StoreResult<()>;

    /// Delete a document (idempotent)
    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// The store's clock, used for server-assigned timestamps
    fn server_time(&self) -> DateTime<Utc> {
        Utc::now()
    }

    /// Subscribe to the change feed
    fn subscribe(&self) -> broadcast::Receiver<ChangeEvent>;
}

/// Allocate a document id the way the hosted store would
pub(crate) fn allocate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
