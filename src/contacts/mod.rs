//! Contact requests between users.
//!
//! A user searches for someone by email or phone and sends a request. The
//! recipient sees it as a notification and accepts or rejects it. On accept
//! both users are added to each other's contacts.
//!
//! # Architecture
//!
//! ```text
//! NotificationFeed (in-memory list, notices)
//!     ├── NotificationReader (pending requests → notifications)
//!     └── RequestResolver (accept / reject)
//! RequestIssuer (search, duplicate check, create)
//!     └── RequestQueue + UserDirectory
//!             └── DocumentStore
//! ```
//!
//! # Request lifecycle
//!
//! ```text
//! pending ──accept──▶ accepted
//!    └─────reject──▶ rejected
//! ```
//!
//! Both end states are final. At most one pending request exists per
//! (sender, recipient) pair; this is checked before creation, not enforced
//! by the store.

mod error;
mod feed;
mod issuer;
mod notifications;
mod queue;
mod resolver;
pub mod types;
mod validation;

pub use error::{ContactError, Result};
pub use feed::{NotificationFeed, Resolution};
pub use issuer::RequestIssuer;
pub use notifications::{format_relative_time, NotificationReader};
pub use queue::RequestQueue;
pub use resolver::RequestResolver;
pub use types::{ContactRequest, Notification, NotificationKind, RequestStatus};
pub use validation::SearchTerm;
