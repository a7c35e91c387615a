//! Crate-level error type for setting up and driving [`SafeRouteCore`](crate::SafeRouteCore).

use thiserror::Error;

use crate::auth::AuthError;
use crate::config::ConfigError;
use crate::store::StoreError;

/// Error type for facade operations that do not end in a notice.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid or unreadable configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Document store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Auth state failure.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Result type alias for facade operations.
pub type Result<T> = std::result::Result<T, CoreError>;
