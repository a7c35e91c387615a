//! Contact search and request creation.

use std::collections::HashSet;

use super::error::{ContactError, Result};
use super::queue::RequestQueue;
use super::types::ContactRequest;
use super::validation::SearchTerm;
use crate::auth::AuthUser;
use crate::store::DocumentStore;
use crate::users::{UserDirectory, UserRecord};

/// Finds users by email or phone and sends them contact requests.
pub struct RequestIssuer<S> {
    users: UserDirectory<S>,
    queue: RequestQueue<S>,
}

impl<S> Clone for RequestIssuer<S> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            queue: self.queue.clone(),
        }
    }
}

impl<S: DocumentStore> RequestIssuer<S> {
    /// Creates an issuer over the given collections.
    #[must_use]
    pub const fn new(users: UserDirectory<S>, queue: RequestQueue<S>) -> Self {
        Self { users, queue }
    }

    /// Finds other users whose email or phone equals `term`.
    ///
    /// Only the field the term looks like is queried. The current user is
    /// never returned, and each user appears once.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidSearchTerm`] before any backend call if
    /// the term is neither an email nor a phone, or a backend error.
    pub async fn search(&self, current_uid: &str, term: &str) -> Result<Vec<UserRecord>> {
        let term = SearchTerm::parse(term)?;
        log::debug!("Searching users by {}", term.field());

        let found = match &term {
            SearchTerm::Email(email) => self.users.find_by_email(email).await?,
            SearchTerm::Phone(phone) => self.users.find_by_phone(phone).await?,
        };

        let mut seen = HashSet::new();
        Ok(found
            .into_iter()
            .filter(|user| user.id != current_uid)
            .filter(|user| seen.insert(user.id.clone()))
            .collect())
    }

    /// Returns whether a pending request from `from` to `to` exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn has_pending_request(&self, from: &str, to: &str) -> Result<bool> {
        Ok(!self.queue.pending_between(from, to).await?.is_empty())
    }

    /// Sends a contact request from `sender` to `recipient_id`.
    ///
    /// The duplicate check and the write are separate calls, so two
    /// concurrent sends can both succeed.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::InvalidRequest`] for a self request,
    /// [`ContactError::NotFound`] if the recipient has no record,
    /// [`ContactError::DuplicateRequest`] if a pending request already
    /// exists, or a backend error.
    pub async fn send_request(
        &self,
        sender: &AuthUser,
        recipient_id: &str,
    ) -> Result<ContactRequest> {
        let now = chrono::Utc::now().timestamp_millis();
        let request = ContactRequest::pending(sender, recipient_id, now)?;

        if self.users.get(recipient_id).await?.is_none() {
            return Err(ContactError::NotFound(format!("user {recipient_id}")));
        }

        if self.has_pending_request(&sender.uid, recipient_id).await? {
            return Err(ContactError::DuplicateRequest {
                from: sender.uid.clone(),
                to: recipient_id.to_string(),
            });
        }

        let created = self.queue.create(&request).await?;
        log::info!(
            "Contact request {} sent from {} to {recipient_id}",
            created.id,
            sender.uid
        );
        Ok(created)
    }
}
