//! Contact request and notification types.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{ContactError, Result};
use crate::auth::AuthUser;
use crate::config::Locale;
use crate::users::FALLBACK_DISPLAY_NAME;

/// Status of a contact request.
///
/// `Pending` is the only non-terminal state. The legal transitions are
/// pending → accepted and pending → rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Waiting for the recipient.
    Pending,
    /// Recipient accepted; both users are contacts.
    Accepted,
    /// Recipient rejected.
    Rejected,
}

impl RequestStatus {
    /// Converts to string representation for storage.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }

    /// Parses from string representation.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Returns whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Rejected)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact request from one user to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    /// Document id. Not part of the stored body.
    #[serde(skip)]
    pub id: String,
    /// Sender user id.
    pub from_user_id: String,
    /// Recipient user id.
    pub to_user_id: String,
    /// Sender display name when the request was sent.
    #[serde(default)]
    pub from_user_name: String,
    /// Sender email when the request was sent.
    #[serde(default)]
    pub from_user_email: String,
    /// Sender photo URL when the request was sent.
    #[serde(default)]
    pub from_user_photo: Option<String>,
    /// Current status.
    pub status: RequestStatus,
    /// Creation time (Unix milliseconds).
    pub created_at: i64,
    /// Accept or reject time (Unix milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<i64>,
}

impl ContactRequest {
    /// Builds a new pending request from `sender` to `recipient_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidRequest`] if either id is blank or the
    /// sender and recipient are the same user.
    pub fn pending(sender: &AuthUser, recipient_id: &str, created_at: i64) -> Result<Self> {
        if sender.uid.trim().is_empty() || recipient_id.trim().is_empty() {
            return Err(ContactError::InvalidRequest(
                "sender and recipient ids are required".to_string(),
            ));
        }
        if sender.uid == recipient_id {
            return Err(ContactError::InvalidRequest(
                "cannot send a request to yourself".to_string(),
            ));
        }

        Ok(Self {
            id: String::new(),
            from_user_id: sender.uid.clone(),
            to_user_id: recipient_id.to_string(),
            from_user_name: sender
                .display_name_trimmed()
                .unwrap_or(FALLBACK_DISPLAY_NAME)
                .to_string(),
            from_user_email: sender.email.clone().unwrap_or_default(),
            from_user_photo: sender.photo_url.clone(),
            status: RequestStatus::Pending,
            created_at,
            resolved_at: None,
        })
    }

    /// Returns whether the request still awaits an answer.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }

    /// Checks that the request may move to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::AlreadyResolved`] if the request is not
    /// pending, or [`ContactError::InvalidRequest`] if `next` is `Pending`.
    pub fn check_transition(&self, next: RequestStatus) -> Result<()> {
        if !self.is_pending() {
            return Err(ContactError::AlreadyResolved {
                id: self.id.clone(),
                status: self.status,
            });
        }
        if !next.is_terminal() {
            return Err(ContactError::InvalidRequest(format!(
                "cannot move request {} to {next}",
                self.id
            )));
        }
        Ok(())
    }
}

/// Kind of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// Someone wants to add the user as a contact.
    ContactRequest,
}

/// A display-ready notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notification id (the request id).
    pub id: String,
    /// Kind of notification.
    pub kind: NotificationKind,
    /// Short title.
    pub title: String,
    /// One-line body.
    pub message: String,
    /// Relative time label ("5 min atrás").
    pub time_label: String,
    /// Whether the user marked it as read.
    pub read: bool,
    /// The underlying request.
    pub request: ContactRequest,
}

impl Notification {
    /// Builds the notification for a pending contact request.
    #[must_use]
    pub fn for_request(request: ContactRequest, time_label: String, locale: Locale) -> Self {
        let sender = &request.from_user_name;
        let (title, message) = match locale {
            Locale::PtBr => (
                "Solicitação de contato".to_string(),
                format!("{sender} quer adicionar você como contato"),
            ),
            Locale::En => (
                "Contact request".to_string(),
                format!("{sender} wants to add you as a contact"),
            ),
        };

        Self {
            id: request.id.clone(),
            kind: NotificationKind::ContactRequest,
            title,
            message,
            time_label,
            read: false,
            request,
        }
    }
}
