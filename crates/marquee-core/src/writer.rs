//! Write facade
//!
//! All content mutations go through `ContentWriter`: raw create/update/set/
//! remove over field maps, plus typed conveniences bound to the section
//! registry. The facade stamps server-assigned creation timestamps and picks
//! between full-document replacement and partial field merge; it does not
//! validate shapes (caller concern) and it does not retry (a failed write is
//! surfaced to the initiating form, which keeps its in-progress edits).
//!
//! Concurrent writes to the same document are not serialized here: the store
//! applies them in arrival order and the last writer wins. Acceptable for a
//! single-admin CMS.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use crate::document::{to_fields, FieldMap};
use crate::error::StoreResult;
use crate::sections::{Section, SectionKind, SINGLETON_ID};
use crate::store::ContentStore;

/// Field stamped with the store clock on create
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Generic create/update/set/remove operations over the backing store
#[derive(Clone)]
pub struct ContentWriter {
    store: Arc<dyn ContentStore>,
}

impl ContentWriter {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    // ==================== Raw operations ====================

    /// Create a document with a store-allocated id
    ///
    /// Stamps `createdAt` with the store clock, replacing any caller-supplied
    /// value; creation time is server-assigned by contract.
    pub async fn create(&self, collection: &str, mut fields: FieldMap) -> StoreResult<String> {
        fields.insert(
            CREATED_AT_FIELD.to_string(),
            Value::String(self.store.server_time().to_rfc3339()),
        );
        let id = self.store.create(collection, fields).await?;
        debug!(collection = %collection, id = %id, "document created");
        Ok(id)
    }

    /// Merge fields into an existing document
    ///
    /// Untouched fields stay as they are. No timestamp is injected; callers
    /// that want one include it in the payload.
    pub async fn update(&self, collection: &str, id: &str, fields: FieldMap) -> StoreResult<()> {
        self.store.update(collection, id, fields).await?;
        debug!(collection = %collection, id = %id, "document updated");
        Ok(())
    }

    /// Write a document at a known id
    ///
    /// With `merge = false` the document is fully replaced: fields absent
    /// from the payload are deleted. With `merge = true` the payload is
    /// merged in, creating the document if it does not exist yet.
    pub async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: FieldMap,
        merge: bool,
    ) -> StoreResult<()> {
        self.store.set(collection, id, fields, merge).await?;
        debug!(collection = %collection, id = %id, merge, "document set");
        Ok(())
    }

    /// Delete a document; deleting an absent document is not an error
    pub async fn remove(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.store.remove(collection, id).await?;
        debug!(collection = %collection, id = %id, "document removed");
        Ok(())
    }

    // ==================== Typed conveniences ====================

    /// Full-replace save of a singleton section from complete form state
    pub async fn save_section<T: Section>(&self, section: &T) -> StoreResult<()> {
        debug_assert!(matches!(T::KIND, SectionKind::Singleton));
        let fields = to_fields(section)?;
        self.set(T::COLLECTION, SINGLETON_ID, fields, false).await
    }

    /// Merge a partial payload into a singleton section, creating it if absent
    pub async fn patch_section<T: Section>(&self, fields: FieldMap) -> StoreResult<()> {
        debug_assert!(matches!(T::KIND, SectionKind::Singleton));
        self.set(T::COLLECTION, SINGLETON_ID, fields, true).await
    }

    /// Create an entry document in a collection-backed section
    pub async fn create_entry<T: Section>(&self, entry: &T) -> StoreResult<String> {
        debug_assert!(matches!(T::KIND, SectionKind::Collection));
        let fields = to_fields(entry)?;
        self.create(T::COLLECTION, fields).await
    }

    /// Full-replace an existing entry document
    pub async fn save_entry<T: Section>(&self, id: &str, entry: &T) -> StoreResult<()> {
        debug_assert!(matches!(T::KIND, SectionKind::Collection));
        let fields = to_fields(entry)?;
        self.set(T::COLLECTION, id, fields, false).await
    }

    /// Delete an entry document
    pub async fn delete_entry<T: Section>(&self, id: &str) -> StoreResult<()> {
        debug_assert!(matches!(T::KIND, SectionKind::Collection));
        self.remove(T::COLLECTION, id).await
    }
}
