//! User records, profiles and page access.
//!
//! One record per user lives in the users collection, keyed by the auth
//! user id. It holds the editable profile and the user's contact map.
//!
//! # Types
//!
//! - [`UserRecord`]: a user's stored record
//! - [`ContactSummary`]: an entry of a user's contact map
//! - [`RouteSummary`]: a saved route
//! - [`ProfileUpdate`]: editable profile fields
//! - [`ProfileStatus`]: a record plus its completeness
//! - [`UserDirectory`]: reads and writes records over a document store

pub mod access;
mod directory;
mod error;
pub mod types;

pub use access::{AccessDecision, AccessRequirement};
pub use directory::UserDirectory;
pub use error::{Result, UserError};
pub use types::{
    ContactSummary, ProfileStatus, ProfileUpdate, RouteSummary, UserRecord, FALLBACK_DISPLAY_NAME,
};
