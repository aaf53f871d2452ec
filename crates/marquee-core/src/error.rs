//! Error types for the content layer
//!
//! Store operations return `StoreError`; the decode boundary between raw
//! documents and typed sections returns `DecodeError`. Bindings carry a
//! cloneable `BindingError` inside their snapshots so a transient failure
//! can ride alongside the last-known value.

use thiserror::Error;

/// Errors that can occur against the backing document store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The document does not exist (update requires an existing document)
    #[error("document '{id}' not found in collection '{collection}'")]
    DocumentMissing { collection: String, id: String },

    /// SQLite database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Field map could not be serialized or parsed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store has been shut down or its connection is unusable
    #[error("store is closed")]
    Closed,
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// A stored document did not match the expected section shape
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to decode document '{id}' in '{collection}': {detail}")]
pub struct DecodeError {
    pub collection: String,
    pub id: String,
    pub detail: String,
}

/// Error slot carried in binding snapshots
///
/// Cloneable by construction: snapshots fan out through watch channels, so
/// the underlying error is flattened to its message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The backing store reported a transport or permission failure
    #[error("store error: {0}")]
    Store(String),

    /// The stored data did not decode into the section's shape
    #[error("decode error: {0}")]
    Decode(String),
}

impl From<&StoreError> for BindingError {
    fn from(err: &StoreError) -> Self {
        BindingError::Store(err.to_string())
    }
}

impl From<&DecodeError> for BindingError {
    fn from(err: &DecodeError) -> Self {
        BindingError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_missing_display() {
        let err = StoreError::DocumentMissing {
            collection: "projects".to_string(),
            id: "abc".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("projects"));
        assert!(msg.contains("abc"));
    }

    #[test]
    fn test_binding_error_from_store_error() {
        let err = StoreError::Closed;
        let binding: BindingError = (&err).into();
        assert_eq!(binding, BindingError::Store("store is closed".to_string()));
    }

    #[test]
    fn test_binding_error_from_decode_error() {
        let err = DecodeError {
            collection: "hero".to_string(),
            id: "main".to_string(),
            detail: "missing field `title`".to_string(),
        };
        let binding: BindingError = (&err).into();
        assert!(matches!(binding, BindingError::Decode(_)));
    }
}
