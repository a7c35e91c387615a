//! Accepting and rejecting contact requests.

use super::error::{ContactError, Result};
use super::queue::RequestQueue;
use super::types::{ContactRequest, RequestStatus};
use crate::store::DocumentStore;
use crate::users::{ContactSummary, UserDirectory, UserRecord};

/// Builds the summary the recipient stores for the sender.
///
/// Blank fields of the sender's record are filled from the snapshot taken
/// when the request was sent.
fn sender_summary(sender: &UserRecord, request: &ContactRequest, added_at: i64) -> ContactSummary {
    let mut summary = sender.to_summary(added_at);
    if sender.display_name.trim().is_empty() && !request.from_user_name.trim().is_empty() {
        summary.name.clone_from(&request.from_user_name);
    }
    if summary.email.is_empty() {
        summary.email.clone_from(&request.from_user_email);
    }
    if summary.photo_url.is_none() {
        summary.photo_url.clone_from(&request.from_user_photo);
    }
    summary
}

/// Moves pending requests to accepted or rejected.
///
/// Accepting performs three independent writes (recipient contacts, sender
/// contacts, request status). A failure part way leaves the earlier writes
/// in place and the request pending, so the accept can be retried.
pub struct RequestResolver<S> {
    users: UserDirectory<S>,
    queue: RequestQueue<S>,
}

impl<S> Clone for RequestResolver<S> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            queue: self.queue.clone(),
        }
    }
}

impl<S: DocumentStore> RequestResolver<S> {
    /// Creates a resolver over the given collections.
    #[must_use]
    pub const fn new(users: UserDirectory<S>, queue: RequestQueue<S>) -> Self {
        Self { users, queue }
    }

    /// Loads a request the current user may move to `next`.
    async fn load_for_transition(
        &self,
        request_id: &str,
        current_uid: &str,
        next: RequestStatus,
    ) -> Result<ContactRequest> {
        let request = self
            .queue
            .get(request_id)
            .await?
            .ok_or_else(|| ContactError::NotFound(format!("request {request_id}")))?;

        if request.to_user_id != current_uid {
            return Err(ContactError::InvalidRequest(format!(
                "request {request_id} is not addressed to {current_uid}"
            )));
        }
        request.check_transition(next)?;
        Ok(request)
    }

    async fn require_user(&self, uid: &str) -> Result<UserRecord> {
        self.users
            .get(uid)
            .await?
            .ok_or_else(|| ContactError::NotFound(format!("user {uid}")))
    }

    /// Accepts a pending request addressed to `current_uid`.
    ///
    /// Both users end up in each other's contacts and the request becomes
    /// accepted. Returns the sender's summary as added to the recipient.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::NotFound`] if the request or either user is
    /// missing, [`ContactError::AlreadyResolved`] if the request is no longer
    /// pending, [`ContactError::InvalidRequest`] if it is addressed to
    /// someone else, or a backend error.
    pub async fn accept(&self, request_id: &str, current_uid: &str) -> Result<ContactSummary> {
        let request = self
            .load_for_transition(request_id, current_uid, RequestStatus::Accepted)
            .await?;
        let sender = self.require_user(&request.from_user_id).await?;
        let recipient = self.require_user(&request.to_user_id).await?;

        let now = chrono::Utc::now().timestamp_millis();
        let for_recipient = sender_summary(&sender, &request, now);
        let for_sender = recipient.to_summary(now);

        self.users.add_contact(&recipient.id, &for_recipient).await?;
        self.users.add_contact(&sender.id, &for_sender).await?;
        self.queue
            .set_status(request_id, RequestStatus::Accepted, now)
            .await?;

        log::info!(
            "Request {request_id} accepted: {} and {} are contacts",
            sender.id,
            recipient.id
        );
        Ok(for_recipient)
    }

    /// Rejects a pending request addressed to `current_uid`.
    ///
    /// Contacts are not touched.
    ///
    /// # Errors
    ///
    /// Returns [`ContactError::NotFound`] if the request is missing,
    /// [`ContactError::AlreadyResolved`] if it is no longer pending,
    /// [`ContactError::InvalidRequest`] if it is addressed to someone else,
    /// or a backend error.
    pub async fn reject(&self, request_id: &str, current_uid: &str) -> Result<()> {
        self.load_for_transition(request_id, current_uid, RequestStatus::Rejected)
            .await?;

        let now = chrono::Utc::now().timestamp_millis();
        self.queue
            .set_status(request_id, RequestStatus::Rejected, now)
            .await?;

        log::info!("Request {request_id} rejected by {current_uid}");
        Ok(())
    }
}
