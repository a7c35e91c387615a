//! Document store abstraction.
//!
//! The app keeps all of its shared state in an external, schema-less
//! document database: one collection of user records and one collection of
//! contact requests. This module defines the small contract the rest of the
//! crate consumes, plus a `SQLite` implementation usable locally and in tests.
//!
//! # Architecture
//!
//! ```text
//! UserDirectory / RequestQueue (typed records)
//!     └── DocumentStore (create / get / update / query)
//!             └── SqliteDocumentStore (JSON bodies in SQLite)
//! ```
//!
//! There are no multi-document transactions. Every call reads or writes
//! exactly one document (or scans one collection for a query).

mod error;
mod sqlite;
pub mod types;

use std::future::Future;
use std::sync::Arc;

pub use error::{Result, StoreError};
pub use sqlite::{SqliteDocumentStore, GENERATED_ID_LEN};
pub use types::{Direction, Document, Fields, MergeMode, OrderBy, Predicate, Query};

/// Generic document store consumed by the app core.
///
/// Implementations must be shareable across tasks. All calls are
/// independent: callers never get atomicity across two calls.
pub trait DocumentStore: Send + Sync {
    /// Creates a document with a generated id and returns that id.
    fn create(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Reads a document, returning `None` if it does not exist.
    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Fields>>> + Send;

    /// Writes fields into a document, creating it if missing.
    ///
    /// With [`MergeMode::Merge`] nested objects are merged into the existing
    /// body; with [`MergeMode::Replace`] the fields become the whole body.
    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: MergeMode,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Returns the documents of a collection matching the query.
    fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Document>>> + Send;
}

impl<S: DocumentStore> DocumentStore for Arc<S> {
    fn create(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<String>> + Send {
        (**self).create(collection, fields)
    }

    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Fields>>> + Send {
        (**self).get(collection, id)
    }

    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: MergeMode,
    ) -> impl Future<Output = Result<()>> + Send {
        (**self).update(collection, id, fields, mode)
    }

    fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Document>>> + Send {
        (**self).query(collection, query)
    }
}
