//! SQLite-backed store
//!
//! Durable `ContentStore` for local content, used by the admin CLI. One
//! `documents` table keyed by (collection, id) with the field map stored as
//! JSON text. Filtering and sorting happen in [`Query`], not in SQL; this
//! store is a dumb document shelf, not a query engine.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use tokio::sync::broadcast;

use super::{allocate_id, ChangeEvent, ContentStore, CHANGE_FEED_CAPACITY};
use crate::config::Config;
use crate::document::{merge_fields, Document, FieldMap};
use crate::error::{StoreError, StoreResult};
use crate::query::Query;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS documents (
    collection TEXT NOT NULL,
    id         TEXT NOT NULL,
    fields     TEXT NOT NULL,
    PRIMARY KEY (collection, id)
);
";

/// Durable document store backed by SQLite
pub struct SqliteStore {
    conn: Mutex<Connection>,
    events: broadcast::Sender<ChangeEvent>,
}

impl SqliteStore {
    /// Open (or create) the store at the given path
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open the store at the configured content database path
    pub fn open_with_config(config: &Config) -> StoreResult<Self> {
        Self::open(config.sqlite_path())
    }

    /// Open an in-memory store (useful for tests)
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        let (events, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Ok(Self {
            conn: Mutex::new(conn),
            events,
        })
    }

    fn emit(&self, event: ChangeEvent) {
        let _ = self.events.send(event);
    }

    fn load_fields(conn: &Connection, collection: &str, id: &str) -> StoreResult<Option<FieldMap>> {
        let json: Option<String> = conn
            .query_row(
                "SELECT fields FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;
        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn store_fields(
        conn: &Connection,
        collection: &str,
        id: &str,
        fields: &FieldMap,
    ) -> StoreResult<()> {
        let json = serde_json::to_string(fields)?;
        conn.execute(
            "INSERT INTO documents (collection, id, fields) VALUES (?1, ?2, ?3)
             ON CONFLICT (collection, id) DO UPDATE SET fields = excluded.fields",
            params![collection, id, json],
        )?;
        Ok(())
    }
}

#[async_trait]
impl ContentStore for SqliteStore {
    async fn load(&self, collection: &str, id: &str) -> StoreResult<Option<Document>> {
        let conn = self.conn.lock().map_err(|_| StoreError::Closed)?;
        Ok(Self::load_fields(&conn, collection, id)?.map(|fields| Document::new(id, fields)))
    }

    async fn run_query(&self, collection: &str, query: &Query) -> StoreResult<Vec<Document>> {
        let candidates = {
            let conn = self.conn.lock().map_err(|_| StoreError::Closed)?;
            let mut stmt =
                conn.prepare("SELECT id, fields FROM documents WHERE collection = ?1")?;
            let rows = stmt.query_map(params![collection], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
            })?;

            let mut candidates = Vec::new();
            for row in rows {
                let (id, json) = row?;
                let fields: FieldMap = serde_json::from_str(&json)?;
                candidates.push(Document::new(id, fields));
            }
            candidates
        };
        Ok(query.apply(candidates))
    }

    async fn create(&self, collection: &str, fields: FieldMap) -> StoreResult<String> {
        let id = allocate_id();
        {
            let conn = self.conn.lock().map_err(|_| StoreError::Closed)?;
            Self::store_fields(&conn, collection, &id, &fields)?;
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
            let conn = self.conn.lock().map_err(|_| StoreError::Closed)?;
            let merged = if merge {
                match Self::load_fields(&conn, collection, id)? {
                    Some(mut existing) => {
                        merge_fields(&mut existing, &fields);
                        existing
                    }
                    None => fields,
                }
            } else {
                fields
            };
            Self::store_fields(&conn, collection, id, &merged)?;
        }
        self.emit(ChangeEvent::written(collection, id));
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: FieldMap) -> StoreResult<()> {
        {
            let conn = self.conn.lock().map_err(|_| StoreError::Closed)?;
            let mut existing = Self::load_fields(&conn, collection, id)?.ok_or_else(|| {
                StoreError::DocumentMissing {
                    collection: collection.to_string(),
                    id: id.to_string(),
                }
            })?;
            merge_fields(&mut existing, &fields);
            Self::store_fields(&conn, collection, id, &existing)?;
        }
        self.emit(ChangeEvent::written(collection, id));
        Ok(())
    }

    async fn remove(&self, collection: &str, id: &str) -> StoreResult<()> {
        let removed = {
            let conn = self.conn.lock().map_err(|_| StoreError::Closed)?;
            conn.execute(
                "DELETE FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
            )? > 0
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Direction;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[tokio::test]
    async fn test_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store
            .create("projects", fields(json!({ "title": "Site", "order": 1 })))
            .await
            .unwrap();

        let doc = store.load("projects", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields.get("title"), Some(&json!("Site")));
        assert_eq!(doc.fields.get("order"), Some(&json!(1)));
    }

    #[tokio::test]
    async fn test_persists_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("content.db");

        let id = {
            let store = SqliteStore::open(&path).unwrap();
            store
                .create("projects", fields(json!({ "title": "Durable" })))
                .await
                .unwrap()
        };

        let store = SqliteStore::open(&path).unwrap();
        let doc = store.load("projects", &id).await.unwrap().unwrap();
        assert_eq!(doc.fields.get("title"), Some(&json!("Durable")));
    }

    #[tokio::test]
    async fn test_set_full_replace_drops_unseen_fields() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .set("hero", "main", fields(json!({ "title": "Old", "stale": 1 })), false)
            .await
            .unwrap();
        store
            .set("hero", "main", fields(json!({ "title": "New" })), false)
            .await
            .unwrap();

        let doc = store.load("hero", "main").await.unwrap().unwrap();
        assert_eq!(doc.fields.get("title"), Some(&json!("New")));
        assert!(!doc.fields.contains_key("stale"));
    }

    #[tokio::test]
    async fn test_set_merge_upserts() {
        let store = SqliteStore::open_in_memory().unwrap();
        store
            .set("sectionVisibility", "main", fields(json!({ "team": false })), true)
            .await
            .unwrap();
        store
            .set("sectionVisibility", "main", fields(json!({ "hero": true })), true)
            .await
            .unwrap();

        let doc = store
            .load("sectionVisibility", "main")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.fields.get("team"), Some(&json!(false)));
        assert_eq!(doc.fields.get("hero"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = SqliteStore::open_in_memory().unwrap();
        let err = store
            .update("hero", "main", fields(json!({ "title": "x" })))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DocumentMissing { .. }));
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.remove("projects", "ghost").await.unwrap();
        store.remove("projects", "ghost").await.unwrap();
    }

    #[tokio::test]
    async fn test_query_sorted_by_order() {
        let store = SqliteStore::open_in_memory().unwrap();
        for order in [2, 0, 1] {
            store
                .create("projects", fields(json!({ "order": order })))
                .await
                .unwrap();
        }

        let docs = store
            .run_query(
                "projects",
                &Query::new().order_by("order", Direction::Ascending),
            )
            .await
            .unwrap();
        let orders: Vec<_> = docs.iter().map(|d| d.fields["order"].clone()).collect();
        assert_eq!(orders, vec![json!(0), json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_change_events() {
        let store = SqliteStore::open_in_memory().unwrap();
        let mut events = store.subscribe();

        store
            .set("hero", "main", fields(json!({ "a": 1 })), false)
            .await
            .unwrap();
        store.remove("hero", "main").await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            ChangeEvent::written("hero", "main")
        );
        assert_eq!(
            events.recv().await.unwrap(),
            ChangeEvent::removed("hero", "main")
        );
    }
}
