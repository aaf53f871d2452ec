//! Raw document representation and the decode boundary
//!
//! Documents are schemaless field maps in the store. Typed section structs
//! only exist on this side of `Document::decode`, which merges the document
//! id into the fields before deserializing so a decoded value can always
//! answer "which document is this".

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::{DecodeError, StoreError, StoreResult};

/// Field name under which the document id is surfaced to decoded values
pub const ID_FIELD: &str = "id";

/// A stored document's fields, keyed by field name
pub type FieldMap = serde_json::Map<String, Value>;

/// A raw document as handed back by the store
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document identifier within its collection
    pub id: String,
    /// The stored fields
    pub fields: FieldMap,
}

impl Document {
    /// Create a document from an id and field map
    pub fn new(id: impl Into<String>, fields: FieldMap) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Decode this document into a typed value
    ///
    /// The document id is merged into the field map under `"id"` before
    /// deserializing. A stored `id` field, if any, is overwritten.
    pub fn decode<T: DeserializeOwned>(&self, collection: &str) -> Result<T, DecodeError> {
        let mut fields = self.fields.clone();
        fields.insert(ID_FIELD.to_string(), Value::String(self.id.clone()));
        serde_json::from_value(Value::Object(fields)).map_err(|e| DecodeError {
            collection: collection.to_string(),
            id: self.id.clone(),
            detail: e.to_string(),
        })
    }
}

/// Encode a typed value into a field map for writing
///
/// The `"id"` key is stripped: a document's id lives in its path, not in its
/// payload, and round-tripping it would shadow the store-assigned one.
pub fn to_fields<T: Serialize>(value: &T) -> StoreResult<FieldMap> {
    match serde_json::to_value(value)? {
        Value::Object(mut fields) => {
            fields.remove(ID_FIELD);
            Ok(fields)
        }
        other => Err(StoreError::Serialization(serde::ser::Error::custom(
            format!("expected a JSON object, got {}", value_kind(&other)),
        ))),
    }
}

/// Merge `patch` into `target` at the top level
///
/// Supplied fields replace existing ones wholesale (no deep merge); fields
/// absent from the patch are left untouched. This is the merge-write
/// semantics shared by `update` and `set(merge = true)`.
pub fn merge_fields(target: &mut FieldMap, patch: &FieldMap) {
    for (key, value) in patch {
        target.insert(key.clone(), value.clone());
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
