//! Query constraints for collection bindings
//!
//! A `Query` is an ordered set of equality filters, an optional sort, and an
//! optional row limit. The store hands back candidate documents; matching,
//! ordering, and limiting all happen here so every store implementation
//! shares identical semantics.
//!
//! An empty query means "all documents, unspecified order". Callers that
//! need a stable, meaningful order must supply an explicit sort constraint,
//! in practice almost always `order_by("order", Direction::Ascending)`.

use std::cmp::Ordering;

use serde_json::Value;

use crate::document::Document;

/// Sort direction for an `order_by` constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// An equality filter on a single field
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub field: String,
    pub value: Value,
}

/// Declarative constraints over one collection
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Query {
    filters: Vec<Filter>,
    order_by: Option<(String, Direction)>,
    limit: Option<usize>,
}

impl Query {
    /// A query matching every document, in store order
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only documents whose `field` equals `value`
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter {
            field: field.into(),
            value: value.into(),
        });
        self
    }

    /// Sort the result by `field` in the given direction
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Truncate the result to at most `n` documents (applied after sorting)
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = Some(n);
        self
    }

    /// Whether a document satisfies every filter
    pub fn matches(&self, doc: &Document) -> bool {
        self.filters.iter().all(|filter| {
            doc.fields
                .get(&filter.field)
                .map(|value| *value == filter.value)
                .unwrap_or(false)
        })
    }

    /// Filter, sort, and truncate a candidate list
    pub fn apply(&self, mut docs: Vec<Document>) -> Vec<Document> {
        docs.retain(|doc| self.matches(doc));

        if let Some((field, direction)) = &self.order_by {
            // Stable sort: documents with equal keys keep store order
            docs.sort_by(|a, b| {
                let ordering = compare_values(
                    a.fields.get(field).unwrap_or(&Value::Null),
                    b.fields.get(field).unwrap_or(&Value::Null),
                );
                match direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            docs.truncate(limit);
        }

        docs
    }
}

/// Total order over JSON values for sorting
///
/// Values of mixed types rank null < bool < number < string < array < object;
/// arrays and objects compare equal among themselves (sorting on them is not
/// meaningful, but must not panic).
fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Value::String(x), Value::String(y)) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(id: &str, value: Value) -> Document {
        match value {
            Value::Object(fields) => Document::new(id, fields),
            _ => panic!("expected object"),
        }
    }

    fn ids(docs: &[Document]) -> Vec<&str> {
        docs.iter().map(|d| d.id.as_str()).collect()
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let docs = vec![doc("a", json!({})), doc("b", json!({ "x": 1 }))];
        let result = Query::new().apply(docs);
        assert_eq!(ids(&result), vec!["a", "b"]);
    }

    #[test]
    fn test_where_eq_filters() {
        let docs = vec![
            doc("a", json!({ "featured": true })),
            doc("b", json!({ "featured": false })),
            doc("c", json!({})),
        ];
        let result = Query::new().where_eq("featured", true).apply(docs);
        assert_eq!(ids(&result), vec!["a"]);
    }

    #[test]
    fn test_multiple_filters_are_conjunctive() {
        let docs = vec![
            doc("a", json!({ "kind": "web", "featured": true })),
            doc("b", json!({ "kind": "web", "featured": false })),
            doc("c", json!({ "kind": "print", "featured": true })),
        ];
        let result = Query::new()
            .where_eq("kind", "web")
            .where_eq("featured", true)
            .apply(docs);
        assert_eq!(ids(&result), vec!["a"]);
    }

    #[test]
    fn test_sort_ascending_for_any_insertion_order() {
        let docs = vec![
            doc("two", json!({ "order": 2 })),
            doc("zero", json!({ "order": 0 })),
            doc("one", json!({ "order": 1 })),
        ];
        let result = Query::new()
            .order_by("order", Direction::Ascending)
            .apply(docs);
        assert_eq!(ids(&result), vec!["zero", "one", "two"]);
    }

    #[test]
    fn test_sort_descending() {
        let docs = vec![
            doc("a", json!({ "order": 1 })),
            doc("b", json!({ "order": 3 })),
            doc("c", json!({ "order": 2 })),
        ];
        let result = Query::new()
            .order_by("order", Direction::Descending)
            .apply(docs);
        assert_eq!(ids(&result), vec!["b", "c", "a"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let docs = vec![
            doc("first", json!({ "order": 1 })),
            doc("second", json!({ "order": 1 })),
            doc("third", json!({ "order": 0 })),
        ];
        let result = Query::new()
            .order_by("order", Direction::Ascending)
            .apply(docs);
        assert_eq!(ids(&result), vec!["third", "first", "second"]);
    }

    #[test]
    fn test_missing_sort_field_ranks_first_ascending() {
        let docs = vec![
            doc("a", json!({ "order": 1 })),
            doc("b", json!({})),
        ];
        let result = Query::new()
            .order_by("order", Direction::Ascending)
            .apply(docs);
        assert_eq!(ids(&result), vec!["b", "a"]);
    }

    #[test]
    fn test_limit_applies_after_sort() {
        let docs = vec![
            doc("a", json!({ "order": 3 })),
            doc("b", json!({ "order": 1 })),
            doc("c", json!({ "order": 2 })),
        ];
        let result = Query::new()
            .order_by("order", Direction::Ascending)
            .limit(2)
            .apply(docs);
        assert_eq!(ids(&result), vec!["b", "c"]);
    }

    #[test]
    fn test_string_sort() {
        let docs = vec![
            doc("b", json!({ "name": "Beta" })),
            doc("a", json!({ "name": "Alpha" })),
        ];
        let result = Query::new()
            .order_by("name", Direction::Ascending)
            .apply(docs);
        assert_eq!(ids(&result), vec!["a", "b"]);
    }
}
