//! Application entry point.
//!
//! [`SafeRouteCore`] wires the configuration, the document store, the auth
//! session and the services built on them. The action helpers at the bottom
//! are the handler boundary: their failures come back as [`Notice`]s.

use std::sync::Arc;

use crate::auth::{AuthSession, AuthUser};
use crate::config::{CoreConfig, Locale};
use crate::contacts::{
    NotificationFeed, NotificationReader, RequestIssuer, RequestQueue, RequestResolver,
};
use crate::error::Result;
use crate::notice::{Message, Notice};
use crate::store::{DocumentStore, SqliteDocumentStore, StoreError};
use crate::users::{
    AccessDecision, AccessRequirement, ProfileStatus, ProfileUpdate, UserDirectory, UserError,
    UserRecord,
};

/// Core interface for the app.
///
/// Generic over the document store so tests and other backends can inject
/// their own.
pub struct SafeRouteCore<S = SqliteDocumentStore> {
    config: CoreConfig,
    auth: AuthSession,
    users: UserDirectory<S>,
    issuer: RequestIssuer<S>,
    reader: NotificationReader<S>,
    resolver: RequestResolver<S>,
}

impl SafeRouteCore<SqliteDocumentStore> {
    /// Opens the local `SQLite` store under the configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid, the data directory cannot
    /// be created, or the database cannot be opened.
    pub fn open(config: CoreConfig) -> Result<Self> {
        config.validate()?;
        std::fs::create_dir_all(&config.data_dir)
            .map_err(|e| StoreError::Storage(format!("Failed to create data directory: {e}")))?;

        let path = config.database_path();
        let store = SqliteDocumentStore::new(&path)?;
        log::info!("Opened document store at {}", path.display());
        Self::with_store(config, Arc::new(store))
    }
}

impl<S: DocumentStore> SafeRouteCore<S> {
    /// Builds the core over an existing store.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is invalid.
    pub fn with_store(config: CoreConfig, store: Arc<S>) -> Result<Self> {
        config.validate()?;

        let users = UserDirectory::new(Arc::clone(&store), config.users_collection.clone());
        let queue = RequestQueue::new(store, config.requests_collection.clone());

        Ok(Self {
            auth: AuthSession::new(),
            issuer: RequestIssuer::new(users.clone(), queue.clone()),
            reader: NotificationReader::new(queue.clone(), config.locale),
            resolver: RequestResolver::new(users.clone(), queue),
            users,
            config,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Locale of user-facing texts.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.config.locale
    }

    /// Auth session.
    #[must_use]
    pub const fn auth(&self) -> &AuthSession {
        &self.auth
    }

    /// User directory.
    #[must_use]
    pub const fn users(&self) -> &UserDirectory<S> {
        &self.users
    }

    /// Request issuer.
    #[must_use]
    pub const fn issuer(&self) -> &RequestIssuer<S> {
        &self.issuer
    }

    /// Notification reader.
    #[must_use]
    pub const fn reader(&self) -> &NotificationReader<S> {
        &self.reader
    }

    /// Request resolver.
    #[must_use]
    pub const fn resolver(&self) -> &RequestResolver<S> {
        &self.resolver
    }

    /// Signs `user` in and makes sure their record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written. The user stays
    /// signed in.
    pub async fn register(&self, user: AuthUser) -> Result<UserRecord> {
        self.auth.sign_in(user.clone());
        Ok(self.users.register(&user).await?)
    }

    /// Signs the current user out.
    pub fn sign_out(&self) {
        self.auth.sign_out();
    }

    /// Profile record and completeness of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if nobody is signed in or the backend fails.
    pub async fn profile_status(&self) -> Result<ProfileStatus> {
        let user = self.auth.require_user()?;
        Ok(self.users.profile_status(&user).await?)
    }

    /// Decides whether a page with `requirement` may be shown now.
    pub async fn check_access(&self, requirement: AccessRequirement) -> AccessDecision {
        let user = self.auth.current_user();
        self.users.check_access(user.as_ref(), requirement).await
    }

    /// Notification feed of a given user.
    #[must_use]
    pub fn feed_for(&self, user_id: impl Into<String>) -> NotificationFeed<S> {
        NotificationFeed::new(self.reader.clone(), self.resolver.clone(), user_id)
            .with_preview_len(self.config.notification_preview)
    }

    /// Searches other users by email or phone.
    ///
    /// An empty result is reported as a notice.
    ///
    /// # Errors
    ///
    /// Returns the notice to show when nobody is signed in, the term is
    /// invalid, nothing matched, or the search failed.
    pub async fn search_contacts(
        &self,
        term: &str,
    ) -> std::result::Result<Vec<UserRecord>, Notice> {
        let locale = self.locale();
        let Some(user) = self.auth.current_user() else {
            return Err(Message::NotSignedIn.error(locale));
        };

        match self.issuer.search(&user.uid, term).await {
            Ok(found) if found.is_empty() => Err(Message::NoUserFound.error(locale)),
            Ok(found) => Ok(found),
            Err(e) => {
                log::warn!("Search by {} failed: {e}", user.uid);
                Err(e.to_notice(Message::SearchFailed, locale))
            }
        }
    }

    /// Sends a contact request from the signed-in user.
    pub async fn send_contact_request(&self, recipient_id: &str) -> Notice {
        let locale = self.locale();
        let Some(user) = self.auth.current_user() else {
            return Message::NotSignedIn.error(locale);
        };

        match self.issuer.send_request(&user, recipient_id).await {
            Ok(_) => Message::RequestSent.success(locale),
            Err(e) => {
                log::warn!("Request from {} to {recipient_id} failed: {e}", user.uid);
                e.to_notice(Message::RequestSendFailed, locale)
            }
        }
    }

    /// Saves the signed-in user's profile and mirrors name and photo into
    /// the auth session.
    pub async fn save_profile(&self, update: &ProfileUpdate) -> Notice {
        let locale = self.locale();
        let Some(user) = self.auth.current_user() else {
            return Message::NotSignedIn.error(locale);
        };

        match self.users.save_profile(&user.uid, update).await {
            Ok(record) => {
                let name = Some(record.display_name).filter(|name| !name.is_empty());
                if let Err(e) = self.auth.update_profile(name, record.photo_url) {
                    log::warn!("Saved profile of {} but auth update failed: {e}", user.uid);
                }
                Message::ProfileSaved.success(locale)
            }
            Err(UserError::PhoneInUse(_)) => Message::PhoneInUse.error(locale),
            Err(UserError::NameRequired) => Message::NameRequired.error(locale),
            Err(e) => {
                log::warn!("Failed to save profile of {}: {e}", user.uid);
                Message::ProfileSaveFailed.error(locale)
            }
        }
    }

    /// Loads the signed-in user's notification feed.
    ///
    /// # Errors
    ///
    /// Returns the notice to show when nobody is signed in or loading failed.
    pub async fn notification_feed(&self) -> std::result::Result<NotificationFeed<S>, Notice> {
        let Some(user) = self.auth.current_user() else {
            return Err(Message::NotSignedIn.error(self.locale()));
        };

        let mut feed = self.feed_for(user.uid);
        match feed.refresh().await {
            Some(notice) => Err(notice),
            None => Ok(feed),
        }
    }
}
