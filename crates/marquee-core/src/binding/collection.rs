//! Multi-document (query) binding

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::ListSnapshot;
use crate::query::Query;
use crate::store::ContentStore;

/// Live subscription to a query over one collection
///
/// A materialized, continuously-refreshed view: the full list is re-emitted
/// on every change to any document in the collection, which covers inserts,
/// updates, deletes, and documents entering or leaving the matched set.
///
/// Without an explicit sort constraint the order is whatever the store
/// returns; callers that need a meaningful order must sort, in practice by
/// the `order` field ascending.
pub struct CollectionBinding<T> {
    store: Arc<dyn ContentStore>,
    collection: String,
    query: Query,
    rx: watch::Receiver<ListSnapshot<T>>,
    task: JoinHandle<()>,
}

impl<T> CollectionBinding<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Bind to a collection under the given query
    pub fn bind(store: Arc<dyn ContentStore>, collection: impl Into<String>, query: Query) -> Self {
        let collection = collection.into();
        let (rx, task) = spawn(store.clone(), collection.clone(), query.clone());
        Self {
            store,
            collection,
            query,
            rx,
            task,
        }
    }

    /// Replace the query constraints
    ///
    /// The old subscription is torn down synchronously before the new one is
    /// attached, so the old listener never stays active alongside the new one.
    pub fn set_query(&mut self, query: Query) {
        self.task.abort();
        self.query = query;
        let (rx, task) = spawn(self.store.clone(), self.collection.clone(), self.query.clone());
        self.rx = rx;
        self.task = task;
    }

    /// The latest snapshot
    pub fn current(&self) -> ListSnapshot<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot
    pub async fn changed(&mut self) -> ListSnapshot<T> {
        if self.rx.changed().await.is_err() {
            return self.rx.borrow().clone();
        }
        self.rx.borrow_and_update().clone()
    }

    /// Wait until the initial query has completed
    pub async fn wait_settled(&mut self) -> ListSnapshot<T> {
        loop {
            let snapshot = self.rx.borrow_and_update().clone();
            if snapshot.is_settled() {
                return snapshot;
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }

    /// A receiver for use in `select!` loops
    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<T>> {
        self.rx.clone()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn query(&self) -> &Query {
        &self.query
    }
}

impl<T> Drop for CollectionBinding<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn spawn<T>(
    store: Arc<dyn ContentStore>,
    collection: String,
    query: Query,
) -> (watch::Receiver<ListSnapshot<T>>, JoinHandle<()>)
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let (tx, rx) = watch::channel(ListSnapshot::loading());
    let task = tokio::spawn(async move {
        let mut events = store.subscribe();
        let mut last: Vec<T> = Vec::new();

        debug!(collection = %collection, "collection binding attached");
        refresh(store.as_ref(), &collection, &query, &mut last, &tx).await;

        loop {
            match events.recv().await {
                // Any event in the collection can change the matched set
                Ok(event) if event.in_collection(&collection) => {
                    refresh(store.as_ref(), &collection, &query, &mut last, &tx).await;
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        collection = %collection,
                        skipped,
                        "change feed lagged, refreshing from store"
                    );
                    refresh(store.as_ref(), &collection, &query, &mut last, &tx).await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        debug!(collection = %collection, "collection binding detached");
    });
    (rx, task)
}

async fn refresh<T>(
    store: &dyn ContentStore,
    collection: &str,
    query: &Query,
    last: &mut Vec<T>,
    tx: &watch::Sender<ListSnapshot<T>>,
) where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let snapshot = match store.run_query(collection, query).await {
        Ok(docs) => {
            let mut decoded = Vec::with_capacity(docs.len());
            let mut failure = None;
            for doc in &docs {
                match doc.decode::<T>(collection) {
                    Ok(value) => decoded.push(value),
                    Err(err) => {
                        warn!(collection = %collection, id = %doc.id, error = %err, "document failed to decode");
                        failure = Some((&err).into());
                        break;
                    }
                }
            }
            match failure {
                // One undecodable document poisons the refresh; keep the
                // last good list rather than emit a partial one
                Some(error) => ListSnapshot::failed(last.clone(), error),
                None => {
                    *last = decoded.clone();
                    ListSnapshot::ready(decoded)
                }
            }
        }
        Err(err) => {
            warn!(collection = %collection, error = %err, "query failed");
            ListSnapshot::failed(last.clone(), (&err).into())
        }
    };
    let _ = tx.send(snapshot);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldMap;
    use crate::error::BindingError;
    use crate::query::Direction;
    use crate::store::MemoryStore;
    use serde::Deserialize;
    use serde_json::{json, Value};
    use std::time::Duration;
    use tokio::time::timeout;

    #[derive(Debug, Clone, Deserialize, PartialEq)]
    struct Entry {
        #[serde(default)]
        id: String,
        title: String,
        #[serde(default)]
        order: i64,
    }

    fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    fn by_order() -> Query {
        Query::new().order_by("order", Direction::Ascending)
    }

    async fn settled(binding: &mut CollectionBinding<Entry>) -> ListSnapshot<Entry> {
        timeout(Duration::from_secs(1), binding.wait_settled())
            .await
            .expect("binding did not settle in time")
    }

    async fn next(binding: &mut CollectionBinding<Entry>) -> ListSnapshot<Entry> {
        timeout(Duration::from_secs(1), binding.changed())
            .await
            .expect("binding did not emit in time")
    }

    #[tokio::test]
    async fn test_empty_collection_settles_empty() {
        let store = Arc::new(MemoryStore::new());
        let mut binding = CollectionBinding::bind(store, "projects", by_order());

        let snapshot = settled(&mut binding).await;
        assert!(snapshot.value.is_empty());
        assert!(snapshot.error.is_none());
    }

    #[tokio::test]
    async fn test_sorted_regardless_of_creation_order() {
        let store = Arc::new(MemoryStore::new());
        for (title, order) in [("c", 2), ("a", 0), ("b", 1)] {
            store
                .create("projects", fields(json!({ "title": title, "order": order })))
                .await
                .unwrap();
        }

        let mut binding = CollectionBinding::bind(store.clone(), "projects", by_order());
        let snapshot = settled(&mut binding).await;
        let titles: Vec<_> = snapshot.value.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_insert_update_delete_all_emit() {
        let store = Arc::new(MemoryStore::new());
        let mut binding = CollectionBinding::bind(store.clone(), "projects", by_order());
        settled(&mut binding).await;

        let id = store
            .create("projects", fields(json!({ "title": "New", "order": 0 })))
            .await
            .unwrap();
        assert_eq!(next(&mut binding).await.value.len(), 1);

        store
            .update("projects", &id, fields(json!({ "title": "Renamed" })))
            .await
            .unwrap();
        assert_eq!(next(&mut binding).await.value[0].title, "Renamed");

        store.remove("projects", &id).await.unwrap();
        assert!(next(&mut binding).await.value.is_empty());
    }

    #[tokio::test]
    async fn test_filter_tracks_membership_changes() {
        let store = Arc::new(MemoryStore::new());
        let id = store
            .create(
                "projects",
                fields(json!({ "title": "p", "order": 0, "featured": false })),
            )
            .await
            .unwrap();

        let query = by_order().where_eq("featured", true);
        let mut binding = CollectionBinding::bind(store.clone(), "projects", query);
        assert!(settled(&mut binding).await.value.is_empty());

        // Entering the matched set emits
        store
            .update("projects", &id, fields(json!({ "featured": true })))
            .await
            .unwrap();
        assert_eq!(next(&mut binding).await.value.len(), 1);

        // Leaving it emits too
        store
            .update("projects", &id, fields(json!({ "featured": false })))
            .await
            .unwrap();
        assert!(next(&mut binding).await.value.is_empty());
    }

    #[tokio::test]
    async fn test_decode_failure_retains_last_list() {
        let store = Arc::new(MemoryStore::new());
        let id = store
            .create("projects", fields(json!({ "title": "Good", "order": 0 })))
            .await
            .unwrap();

        let mut binding = CollectionBinding::bind(store.clone(), "projects", by_order());
        assert_eq!(settled(&mut binding).await.value.len(), 1);

        store
            .set("projects", &id, fields(json!({ "title": 42, "order": 0 })), false)
            .await
            .unwrap();
        let snapshot = next(&mut binding).await;
        assert_eq!(snapshot.value.len(), 1);
        assert_eq!(snapshot.value[0].title, "Good");
        assert!(matches!(snapshot.error, Some(BindingError::Decode(_))));
    }

    #[tokio::test]
    async fn test_set_query_resets_and_resubscribes() {
        let store = Arc::new(MemoryStore::new());
        for (title, order) in [("a", 0), ("b", 1), ("c", 2)] {
            store
                .create("projects", fields(json!({ "title": title, "order": order })))
                .await
                .unwrap();
        }

        let mut binding = CollectionBinding::bind(store.clone(), "projects", by_order());
        assert_eq!(settled(&mut binding).await.value.len(), 3);

        binding.set_query(by_order().limit(1));
        // Fresh channel: nothing from the old query survives
        assert!(binding.current().loading);
        let snapshot = settled(&mut binding).await;
        assert_eq!(snapshot.value.len(), 1);
        assert_eq!(snapshot.value[0].title, "a");
    }

    #[tokio::test]
    async fn test_other_collections_do_not_emit() {
        let store = Arc::new(MemoryStore::new());
        let mut binding = CollectionBinding::bind(store.clone(), "projects", by_order());
        settled(&mut binding).await;

        store
            .create("testimonials", fields(json!({ "title": "x", "order": 0 })))
            .await
            .unwrap();

        let result = timeout(Duration::from_millis(100), binding.changed()).await;
        assert!(result.is_err(), "writes elsewhere must not emit");
    }
}
