//! Error types for user and profile operations.

use thiserror::Error;

use crate::store::StoreError;

/// Error type for user directory operations.
#[derive(Error, Debug)]
pub enum UserError {
    /// The profile has no display name.
    #[error("Display name is required")]
    NameRequired,

    /// Another user already has this phone.
    #[error("Phone already in use: {0}")]
    PhoneInUse(String),

    /// User record not found.
    #[error("User not found: {0}")]
    NotFound(String),

    /// Backend failure.
    #[error("Backend error: {0}")]
    Store(#[from] StoreError),
}

/// Result type alias for user directory operations.
pub type Result<T> = std::result::Result<T, UserError>;
