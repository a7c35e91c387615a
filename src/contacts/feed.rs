//! In-memory notification list with user-facing outcomes.

use super::notifications::NotificationReader;
use super::resolver::RequestResolver;
use super::types::Notification;
use crate::config::{Locale, DEFAULT_NOTIFICATION_PREVIEW};
use crate::notice::{Message, Notice};
use crate::store::DocumentStore;
use crate::users::ContactSummary;

/// Outcome of accepting a notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Notice to show.
    pub notice: Notice,
    /// The contact added to the current user, on success.
    pub added_contact: Option<ContactSummary>,
}

/// The current user's pending notifications.
///
/// Every action returns a [`Notice`] instead of an error. A failed accept or
/// reject leaves the item in the list so it can be retried.
pub struct NotificationFeed<S> {
    reader: NotificationReader<S>,
    resolver: RequestResolver<S>,
    user_id: String,
    preview_len: usize,
    items: Vec<Notification>,
}

impl<S: DocumentStore> NotificationFeed<S> {
    /// Creates an empty feed for `user_id`. Call [`refresh`](Self::refresh)
    /// to load it.
    #[must_use]
    pub fn new(
        reader: NotificationReader<S>,
        resolver: RequestResolver<S>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            resolver,
            user_id: user_id.into(),
            preview_len: DEFAULT_NOTIFICATION_PREVIEW,
            items: Vec::new(),
        }
    }

    /// Sets how many notifications [`preview`](Self::preview) shows.
    #[must_use]
    pub const fn with_preview_len(mut self, len: usize) -> Self {
        self.preview_len = len;
        self
    }

    /// Owner of this feed.
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    const fn locale(&self) -> Locale {
        self.reader.locale()
    }

    /// Reloads the pending notifications.
    ///
    /// Items already marked as read stay read. On failure the current list
    /// is kept and an error notice is returned.
    pub async fn refresh(&mut self) -> Option<Notice> {
        match self.reader.load(&self.user_id).await {
            Ok(mut loaded) => {
                for item in &mut loaded {
                    item.read = self
                        .items
                        .iter()
                        .any(|old| old.id == item.id && old.read);
                }
                self.items = loaded;
                None
            }
            Err(e) => {
                log::warn!("Failed to load notifications for {}: {e}", self.user_id);
                Some(Message::NotificationsLoadFailed.error(self.locale()))
            }
        }
    }

    /// All loaded notifications, newest first.
    #[must_use]
    pub fn notifications(&self) -> &[Notification] {
        &self.items
    }

    /// The newest few notifications.
    #[must_use]
    pub fn preview(&self) -> &[Notification] {
        &self.items[..self.preview_len.min(self.items.len())]
    }

    /// Number of notifications not marked as read.
    #[must_use]
    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|item| !item.read).count()
    }

    /// Marks one notification as read. Returns whether it was found.
    pub fn mark_as_read(&mut self, id: &str) -> bool {
        self.items
            .iter_mut()
            .find(|item| item.id == id)
            .map(|item| item.read = true)
            .is_some()
    }

    /// Marks every notification as read.
    pub fn mark_all_as_read(&mut self) {
        for item in &mut self.items {
            item.read = true;
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Accepts the request behind notification `id`.
    pub async fn accept(&mut self, id: &str) -> Resolution {
        let locale = self.locale();
        let Some(index) = self.position(id) else {
            return Resolution {
                notice: Message::NotificationMissing.error(locale),
                added_contact: None,
            };
        };

        match self.resolver.accept(id, &self.user_id).await {
            Ok(contact) => {
                self.items.remove(index);
                Resolution {
                    notice: Message::ContactAdded.success(locale),
                    added_contact: Some(contact),
                }
            }
            Err(e) => {
                log::warn!("Failed to accept request {id}: {e}");
                Resolution {
                    notice: e.to_notice(Message::AcceptFailed, locale),
                    added_contact: None,
                }
            }
        }
    }

    /// Rejects the request behind notification `id`.
    pub async fn reject(&mut self, id: &str) -> Notice {
        let locale = self.locale();
        let Some(index) = self.position(id) else {
            return Message::NotificationMissing.error(locale);
        };

        match self.resolver.reject(id, &self.user_id).await {
            Ok(()) => {
                self.items.remove(index);
                Message::RequestRejected.success(locale)
            }
            Err(e) => {
                log::warn!("Failed to reject request {id}: {e}");
                e.to_notice(Message::RejectFailed, locale)
            }
        }
    }
}
