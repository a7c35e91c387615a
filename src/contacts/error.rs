//! Error types for the contact request exchange.

use thiserror::Error;

use super::types::RequestStatus;
use crate::config::Locale;
use crate::notice::{Message, Notice};
use crate::store::StoreError;

/// Error type for contact request operations.
#[derive(Error, Debug)]
pub enum ContactError {
    /// Search term is neither an email nor a phone number.
    #[error("Invalid search term: {0}")]
    InvalidSearchTerm(String),

    /// Request arguments are inconsistent (self request, wrong recipient).
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A pending request already exists for this sender and recipient.
    #[error("Pending request already exists from {from} to {to}")]
    DuplicateRequest {
        /// Sender id.
        from: String,
        /// Recipient id.
        to: String,
    },

    /// Referenced user or request does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The request was already accepted or rejected.
    #[error("Request {id} already {status}")]
    AlreadyResolved {
        /// Request id.
        id: String,
        /// Its current status.
        status: RequestStatus,
    },

    /// Backend failure.
    #[error("Backend error: {0}")]
    Store(#[from] StoreError),
}

impl ContactError {
    /// Converts this error into the notice shown to the user.
    ///
    /// Errors without a dedicated text use `fallback`.
    #[must_use]
    pub fn to_notice(&self, fallback: Message, locale: Locale) -> Notice {
        let message = match self {
            Self::InvalidSearchTerm(_) => Message::InvalidSearchTerm,
            Self::DuplicateRequest { .. } => Message::DuplicateRequest,
            _ => fallback,
        };
        message.error(locale)
    }
}

/// Result type alias for contact request operations.
pub type Result<T> = std::result::Result<T, ContactError>;
