//! `SQLite`-backed document store.
//!
//! Every document is a JSON text body addressed by `(collection, id)`.
//! Filtering and ordering run in Rust over the decoded bodies so that
//! predicates keep exact JSON equality semantics.

// SQLite operations need to hold the lock for the duration of the operation.
#![allow(clippy::significant_drop_tightening)]

use std::future::Future;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use futures::future;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;

use super::error::{Result, StoreError};
use super::types::{merge_fields, Document, Fields, MergeMode, Query};
use super::DocumentStore;

/// Length of generated document ids.
pub const GENERATED_ID_LEN: usize = 20;

/// `SQLite`-based document store.
///
/// Thread-safe wrapper around a single `SQLite` connection. Each document
/// operation holds the connection lock for its own duration only; nothing
/// spans several documents.
pub struct SqliteDocumentStore {
    conn: Mutex<Connection>,
}

impl SqliteDocumentStore {
    /// Opens (or creates) a store at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        log::debug!("Opened document store at {}", path.display());
        Ok(store)
    }

    /// Creates an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Storage(format!("Failed to acquire database lock: {e}")))
    }

    fn initialize_schema(&self) -> Result<()> {
        let conn = self.lock()?;

        conn.execute_batch(
            r"
            CREATE TABLE IF NOT EXISTS documents (
                collection TEXT NOT NULL,
                id TEXT NOT NULL,
                body TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL,
                PRIMARY KEY (collection, id)
            );

            CREATE INDEX IF NOT EXISTS idx_documents_collection
                ON documents (collection, created_at);
            ",
        )?;

        Ok(())
    }

    fn create_sync(&self, collection: &str, fields: &Fields) -> Result<String> {
        check_name("collection", collection)?;

        let id = generate_id();
        let body = serde_json::to_string(fields)?;
        let now = chrono::Utc::now().timestamp_millis();

        let conn = self.lock()?;
        conn.execute(
            r"
            INSERT INTO documents (collection, id, body, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ",
            params![collection, &id, &body, now],
        )?;

        log::debug!("Created document {collection}/{id}");
        Ok(id)
    }

    fn get_sync(&self, collection: &str, id: &str) -> Result<Option<Fields>> {
        check_name("collection", collection)?;
        check_name("document id", id)?;

        let conn = self.lock()?;
        let body: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        body.map(|body| decode_body(collection, id, &body))
            .transpose()
    }

    fn update_sync(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: MergeMode,
    ) -> Result<()> {
        check_name("collection", collection)?;
        check_name("document id", id)?;

        let now = chrono::Utc::now().timestamp_millis();
        let conn = self.lock()?;

        let existing: Option<String> = conn
            .query_row(
                "SELECT body FROM documents WHERE collection = ?1 AND id = ?2",
                params![collection, id],
                |row| row.get(0),
            )
            .optional()?;

        let merged = match (existing, mode) {
            (Some(body), MergeMode::Merge) => {
                let mut current = decode_body(collection, id, &body)?;
                merge_fields(&mut current, fields);
                current
            }
            (_, _) => fields,
        };

        let body = serde_json::to_string(&merged)?;
        conn.execute(
            r"
            INSERT INTO documents (collection, id, body, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
            ON CONFLICT(collection, id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at
            ",
            params![collection, id, &body, now],
        )?;

        log::debug!("Updated document {collection}/{id} ({mode:?})");
        Ok(())
    }

    fn query_sync(&self, collection: &str, query: &Query) -> Result<Vec<Document>> {
        check_name("collection", collection)?;

        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r"
            SELECT id, body
            FROM documents
            WHERE collection = ?1
            ORDER BY created_at, id
            ",
        )?;

        let rows = stmt
            .query_map(params![collection], |row| {
                let id: String = row.get(0)?;
                let body: String = row.get(1)?;
                Ok((id, body))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let documents = rows
            .into_iter()
            .map(|(id, body)| {
                let fields = decode_body(collection, &id, &body)?;
                Ok(Document { id, fields })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(query.apply(documents))
    }

    /// Returns the number of documents stored in a collection.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self, collection: &str) -> Result<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM documents WHERE collection = ?1",
            params![collection],
            |row| row.get(0),
        )?;
        usize::try_from(count).map_err(|e| StoreError::Storage(format!("Invalid count: {e}")))
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn create(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<String>> + Send {
        future::ready(self.create_sync(collection, &fields))
    }

    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Fields>>> + Send {
        future::ready(self.get_sync(collection, id))
    }

    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: MergeMode,
    ) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.update_sync(collection, id, fields, mode))
    }

    fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Document>>> + Send {
        future::ready(self.query_sync(collection, query))
    }
}

fn check_name(what: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::InvalidArgument(format!("Empty {what}")));
    }
    Ok(())
}

fn decode_body(collection: &str, id: &str, body: &str) -> Result<Fields> {
    match serde_json::from_str::<Value>(body)? {
        Value::Object(fields) => Ok(fields),
        _ => Err(StoreError::InvalidDocument {
            collection: collection.to_string(),
            id: id.to_string(),
            reason: "body is not a JSON object".to_string(),
        }),
    }
}

fn generate_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_ID_LEN)
        .map(char::from)
        .collect()
}
