//! Single-document binding

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::Snapshot;
use crate::store::ContentStore;

/// Live subscription to one document
///
/// Yields `Snapshot { value: None, loading: true }` immediately, then a
/// settled snapshot after the initial load and after every change to the
/// document. A non-existent document settles as `value: None` with no error.
///
/// The handle exclusively owns its subscription: dropping it detaches the
/// listener, and [`retarget`](Self::retarget) detaches the old listener
/// before attaching a new one, so a stale emission can never leak across
/// re-subscription (each target gets a fresh channel).
pub struct DocumentBinding<T> {
    store: Arc<dyn ContentStore>,
    collection: String,
    id: String,
    rx: watch::Receiver<Snapshot<T>>,
    task: JoinHandle<()>,
}

impl<T> DocumentBinding<T>
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Bind to `(collection, id)` and start delivering snapshots
    pub fn bind(
        store: Arc<dyn ContentStore>,
        collection: impl Into<String>,
        id: impl Into<String>,
    ) -> Self {
        let collection = collection.into();
        let id = id.into();
        let (rx, task) = spawn(store.clone(), collection.clone(), id.clone());
        Self {
            store,
            collection,
            id,
            rx,
            task,
        }
    }

    /// Point this binding at a different document
    ///
    /// The old subscription is torn down synchronously before the new one is
    /// attached; the snapshot resets to loading.
    pub fn retarget(&mut self, collection: impl Into<String>, id: impl Into<String>) {
        self.task.abort();
        self.collection = collection.into();
        self.id = id.into();
        let (rx, task) = spawn(self.store.clone(), self.collection.clone(), self.id.clone());
        self.rx = rx;
        self.task = task;
    }

    /// The latest snapshot
    pub fn current(&self) -> Snapshot<T> {
        self.rx.borrow().clone()
    }

    /// Wait for the next snapshot
    pub async fn changed(&mut self) -> Snapshot<T> {
        if self.rx.changed().await.is_err() {
            // Task gone (store shut down); last snapshot stands
            return self.rx.borrow().clone();
        }
        self.rx.borrow_and_update().clone()
    }

    /// Wait until the initial load has completed
    pub async fn wait_settled(&mut self) -> Snapshot<T> {
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
    pub fn subscribe(&self) -> watch::Receiver<Snapshot<T>> {
        self.rx.clone()
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl<T> Drop for DocumentBinding<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn spawn<T>(
    store: Arc<dyn ContentStore>,
    collection: String,
    id: String,
) -> (watch::Receiver<Snapshot<T>>, JoinHandle<()>)
where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let (tx, rx) = watch::channel(Snapshot::loading());
    let task = tokio::spawn(async move {
        // Subscribe before the initial load so a write landing in between
        // still triggers a refresh
        let mut events = store.subscribe();
        let mut last: Option<T> = None;

        debug!(collection = %collection, id = %id, "document binding attached");
        refresh(store.as_ref(), &collection, &id, &mut last, &tx).await;

        loop {
            match events.recv().await {
                Ok(event) if event.concerns(&collection, &id) => {
                    refresh(store.as_ref(), &collection, &id, &mut last, &tx).await;
                }
                Ok(_) => {}
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(
                        collection = %collection,
                        id = %id,
                        skipped,
                        "change feed lagged, refreshing from store"
                    );
                    refresh(store.as_ref(), &collection, &id, &mut last, &tx).await;
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        debug!(collection = %collection, id = %id, "document binding detached");
    });
    (rx, task)
}

async fn refresh<T>(
    store: &dyn ContentStore,
    collection: &str,
    id: &str,
    last: &mut Option<T>,
    tx: &watch::Sender<Snapshot<T>>,
) where
    T: DeserializeOwned + Clone + Send + Sync + 'static,
{
    let snapshot = match store.load(collection, id).await {
        Ok(Some(doc)) => match doc.decode::<T>(collection) {
            Ok(value) => {
                *last = Some(value.clone());
                Snapshot::ready(Some(value))
            }
            Err(err) => {
                warn!(collection = %collection, id = %id, error = %err, "document failed to decode");
                Snapshot::failed(last.clone(), (&err).into())
            }
        },
        // Absent document is a settled state, not an error
        Ok(None) => {
            *last = None;
            Snapshot::ready(None)
        }
        Err(err) => {
            warn!(collection = %collection, id = %id, error = %err, "document load failed");
            Snapshot::failed(last.clone(), (&err).into())
        }
    };
    let _ = tx.send(snapshot);
}
