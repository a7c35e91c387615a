//! Error types for document store operations.

use thiserror::Error;

/// Error type for document store operations.
///
/// Every failure coming out of the backend (database, lock, encoding) ends
/// up here. Higher layers wrap it as their "backend error" variant.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Storage operation failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error from `SQLite`.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Document body could not be encoded or decoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A stored document does not match the expected record shape.
    #[error("Invalid document {collection}/{id}: {reason}")]
    InvalidDocument {
        /// Collection the document lives in.
        collection: String,
        /// Document id.
        id: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Invalid argument passed to the store (empty collection name, bad path).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend refused or could not serve the request.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
