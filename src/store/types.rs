//! Value types shared by every document store implementation.
//!
//! Documents are schema-less JSON objects. Queries are a conjunction of
//! equality predicates on dotted field paths plus an optional ordering.

use std::cmp::Ordering;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::error::{Result, StoreError};

/// Field mapping of a single document.
pub type Fields = Map<String, Value>;

/// A document as returned by a query: its id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document id, unique within its collection.
    pub id: String,
    /// Document body.
    pub fields: Fields,
}

impl Document {
    /// Decodes the document body into a typed record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidDocument`] if the body does not match `T`.
    pub fn decode<T: DeserializeOwned>(self, collection: &str) -> Result<T> {
        from_fields(collection, &self.id, self.fields)
    }
}

/// How an update combines with the existing document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// The given fields become the whole document.
    Replace,
    /// Nested objects are merged key by key; other values are overwritten.
    #[default]
    Merge,
}

/// Sort direction for [`OrderBy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

/// Ordering clause of a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Dotted field path to sort on.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}

/// Equality predicate on a dotted field path.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Dotted field path (`"contacts.u1.email"`).
    pub field: String,
    /// Value the field must equal.
    pub value: Value,
}

impl Predicate {
    /// Creates an equality predicate.
    #[must_use]
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Returns whether the document satisfies this predicate.
    ///
    /// A missing field never matches.
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        field_at(fields, &self.field).is_some_and(|v| *v == self.value)
    }
}

/// Query over a single collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// All predicates must hold.
    pub predicates: Vec<Predicate>,
    /// Optional ordering of the result.
    pub order_by: Option<OrderBy>,
    /// Optional cap on the number of returned documents.
    pub limit: Option<usize>,
}

impl Query {
    /// Creates an empty query matching every document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality predicate.
    #[must_use]
    pub fn filter_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.predicates.push(Predicate::eq(field, value));
        self
    }

    /// Sets the ordering.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: field.into(),
            direction,
        });
        self
    }

    /// Caps the number of results.
    #[must_use]
    pub const fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns whether a document satisfies every predicate.
    #[must_use]
    pub fn matches(&self, fields: &Fields) -> bool {
        self.predicates.iter().all(|p| p.matches(fields))
    }

    /// Filters, sorts and truncates a set of documents according to this query.
    ///
    /// Sorting is stable, so documents with equal keys keep their input order.
    #[must_use]
    pub fn apply(&self, documents: Vec<Document>) -> Vec<Document> {
        let mut matched: Vec<Document> = documents
            .into_iter()
            .filter(|doc| self.matches(&doc.fields))
            .collect();

        if let Some(order) = &self.order_by {
            matched.sort_by(|a, b| {
                let ordering = compare_values(
                    field_at(&a.fields, &order.field),
                    field_at(&b.fields, &order.field),
                );
                match order.direction {
                    Direction::Ascending => ordering,
                    Direction::Descending => ordering.reverse(),
                }
            });
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }

        matched
    }
}

/// Resolves a dotted path inside a document.
#[must_use]
pub fn field_at<'a>(fields: &'a Fields, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = fields.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Deep-merges `patch` into `target`.
///
/// Objects present on both sides are merged recursively. Any other value in
/// `patch` overwrites the value in `target`.
pub fn merge_fields(target: &mut Fields, patch: Fields) {
    for (key, value) in patch {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                merge_fields(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

/// Orders two optional JSON values.
///
/// Missing and null sort first, then booleans, numbers, strings. Values of
/// other kinds compare equal.
#[must_use]
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    const fn rank(value: Option<&Value>) -> u8 {
        match value {
            None | Some(Value::Null) => 0,
            Some(Value::Bool(_)) => 1,
            Some(Value::Number(_)) => 2,
            Some(Value::String(_)) => 3,
            Some(Value::Array(_)) => 4,
            Some(Value::Object(_)) => 5,
        }
    }

    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => x
                    .as_f64()
                    .partial_cmp(&y.as_f64())
                    .unwrap_or(Ordering::Equal),
            }
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}

/// Serializes a record into document fields.
///
/// # Errors
///
/// Returns an error if the record does not serialize to a JSON object.
pub fn to_fields<T: Serialize>(record: &T) -> Result<Fields> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        other => Err(StoreError::InvalidArgument(format!(
            "Record must serialize to an object, got {other}"
        ))),
    }
}

/// Deserializes document fields into a typed record.
///
/// # Errors
///
/// Returns [`StoreError::InvalidDocument`] naming the collection and id if
/// the fields do not match `T`.
pub fn from_fields<T: DeserializeOwned>(collection: &str, id: &str, fields: Fields) -> Result<T> {
    serde_json::from_value(Value::Object(fields)).map_err(|e| StoreError::InvalidDocument {
        collection: collection.to_string(),
        id: id.to_string(),
        reason: e.to_string(),
    })
}
