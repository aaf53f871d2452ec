//! Live bindings over store subscriptions
//!
//! A binding owns exactly one background task that watches the change feed
//! and republishes decoded snapshots through a `tokio::sync::watch` channel.
//! Consumers see a `loading` snapshot first, then a settled snapshot after
//! the initial load and after every relevant change. Dropping the handle
//! aborts the task, so there is never a dangling listener.
//!
//! Error contract: a store or decode failure fills the snapshot's error slot
//! but keeps the last good value, so a transient failure does not blank
//! whatever is currently rendered.

mod collection;
mod document;

pub use collection::CollectionBinding;
pub use document::DocumentBinding;

use crate::error::BindingError;

/// The state of a document binding at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    /// The decoded value; `None` while loading or when the document is absent
    pub value: Option<T>,
    /// True until the first load completes
    pub loading: bool,
    /// Most recent failure, if the last refresh did not succeed
    pub error: Option<BindingError>,
}

impl<T> Snapshot<T> {
    pub(crate) fn loading() -> Self {
        Self {
            value: None,
            loading: true,
            error: None,
        }
    }

    pub(crate) fn ready(value: Option<T>) -> Self {
        Self {
            value,
            loading: false,
            error: None,
        }
    }

    pub(crate) fn failed(value: Option<T>, error: BindingError) -> Self {
        Self {
            value,
            loading: false,
            error: Some(error),
        }
    }

    /// Whether the initial load has completed
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}

/// The state of a collection binding at a point in time
#[derive(Debug, Clone, PartialEq)]
pub struct ListSnapshot<T> {
    /// The decoded documents, in query order
    pub value: Vec<T>,
    /// True until the first query completes
    pub loading: bool,
    /// Most recent failure, if the last refresh did not succeed
    pub error: Option<BindingError>,
}

impl<T> ListSnapshot<T> {
    pub(crate) fn loading() -> Self {
        Self {
            value: Vec::new(),
            loading: true,
            error: None,
        }
    }

    pub(crate) fn ready(value: Vec<T>) -> Self {
        Self {
            value,
            loading: false,
            error: None,
        }
    }

    pub(crate) fn failed(value: Vec<T>, error: BindingError) -> Self {
        Self {
            value,
            loading: false,
            error: Some(error),
        }
    }

    /// Whether the initial query has completed
    pub fn is_settled(&self) -> bool {
        !self.loading
    }
}
