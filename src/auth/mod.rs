//! Authentication state.
//!
//! Authentication itself is an external service. This module only models
//! its outcome: who is signed in right now, and a stream of changes that
//! page gating and other components can follow.
//!
//! # Types
//!
//! - [`AuthUser`]: the signed-in user as reported by the auth service
//! - [`AuthSession`]: current user plus a change subscription
//! - [`AuthError`]: failures reported by the auth service

mod error;
mod session;

pub use error::{auth_error_message, AuthError, Result};
pub use session::{AuthSession, AuthUser};
