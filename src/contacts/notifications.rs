//! Pending request notifications.

use super::error::Result;
use super::queue::RequestQueue;
use super::types::{ContactRequest, Notification};
use crate::config::Locale;
use crate::store::DocumentStore;

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// Formats how long ago `created_at_ms` was, seen from `now_ms`.
///
/// Under a minute is "now", under an hour counts minutes, under a day
/// counts hours, and anything older counts days ("1 days ago" included).
/// Timestamps in the future count as "now".
#[must_use]
pub fn format_relative_time(created_at_ms: i64, now_ms: i64, locale: Locale) -> String {
    let elapsed = now_ms.saturating_sub(created_at_ms).max(0);

    if elapsed < MINUTE_MS {
        return match locale {
            Locale::PtBr => "Agora".to_string(),
            Locale::En => "now".to_string(),
        };
    }
    if elapsed < HOUR_MS {
        let minutes = elapsed / MINUTE_MS;
        return match locale {
            Locale::PtBr => format!("{minutes} min atrás"),
            Locale::En => format!("{minutes} min ago"),
        };
    }
    if elapsed < DAY_MS {
        let hours = elapsed / HOUR_MS;
        return match locale {
            Locale::PtBr => format!("{hours}h atrás"),
            Locale::En => format!("{hours}h ago"),
        };
    }

    let days = elapsed / DAY_MS;
    match locale {
        Locale::PtBr => format!("{days} dias atrás"),
        Locale::En => format!("{days} days ago"),
    }
}

/// Loads the pending requests addressed to a user as notifications.
pub struct NotificationReader<S> {
    queue: RequestQueue<S>,
    locale: Locale,
}

impl<S> Clone for NotificationReader<S> {
    fn clone(&self) -> Self {
        Self {
            queue: self.queue.clone(),
            locale: self.locale,
        }
    }
}

impl<S: DocumentStore> NotificationReader<S> {
    /// Creates a reader producing texts in `locale`.
    #[must_use]
    pub const fn new(queue: RequestQueue<S>, locale: Locale) -> Self {
        Self { queue, locale }
    }

    /// Locale of the produced texts.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Loads the notifications of `user_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn load(&self, user_id: &str) -> Result<Vec<Notification>> {
        self.load_at(user_id, chrono::Utc::now().timestamp_millis())
            .await
    }

    /// Loads the notifications of `user_id` with time labels relative to
    /// `now_ms`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn load_at(&self, user_id: &str, now_ms: i64) -> Result<Vec<Notification>> {
        let pending = self.queue.pending_for(user_id).await?;
        log::debug!("Loaded {} pending requests for {user_id}", pending.len());

        Ok(pending
            .into_iter()
            .filter(ContactRequest::is_pending)
            .map(|request| {
                let label = format_relative_time(request.created_at, now_ms, self.locale);
                Notification::for_request(request, label, self.locale)
            })
            .collect())
    }
}
