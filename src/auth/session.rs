//! Current-user state with change subscription.

use futures::stream::{self, Stream};
use tokio::sync::watch;

use super::error::{AuthError, Result};

/// A user as reported by the authentication service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// Unique id assigned by the auth service. Also the user's record id.
    pub uid: String,
    /// Display name, if the user set one.
    pub display_name: Option<String>,
    /// Sign-in email, if any.
    pub email: Option<String>,
    /// Profile photo URL, if any.
    pub photo_url: Option<String>,
}

impl AuthUser {
    /// Creates a user with only an id.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: None,
            email: None,
            photo_url: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Sets the email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the photo URL.
    #[must_use]
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Display name trimmed, or `None` when unset or blank.
    #[must_use]
    pub fn display_name_trimmed(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// Holds who is signed in and notifies subscribers of changes.
///
/// Construct one per process and pass it to whatever needs it.
#[derive(Debug)]
pub struct AuthSession {
    state: watch::Sender<Option<AuthUser>>,
}

impl Default for AuthSession {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthSession {
    /// Creates a session with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        let (state, _) = watch::channel(None);
        Self { state }
    }

    /// Records a successful sign-in.
    pub fn sign_in(&self, user: AuthUser) {
        log::info!("User {} signed in", user.uid);
        self.state.send_replace(Some(user));
    }

    /// Records a sign-out. Does nothing if nobody is signed in.
    pub fn sign_out(&self) {
        if let Some(previous) = self.state.send_replace(None) {
            log::info!("User {} signed out", previous.uid);
        }
    }

    /// Replaces the profile fields of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::NotSignedIn`] if nobody is signed in.
    pub fn update_profile(
        &self,
        display_name: Option<String>,
        photo_url: Option<String>,
    ) -> Result<()> {
        let updated = self.state.send_if_modified(|state| {
            let Some(user) = state.as_mut() else {
                return false;
            };
            user.display_name = display_name;
            user.photo_url = photo_url;
            true
        });

        if updated {
            Ok(())
        } else {
            Err(AuthError::NotSignedIn)
        }
    }

    /// Returns the signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.state.borrow().clone()
    }

    /// Returns the signed-in user or [`AuthError::NotSignedIn`].
    ///
    /// # Errors
    ///
    /// Returns an error if nobody is signed in.
    pub fn require_user(&self) -> Result<AuthUser> {
        self.current_user().ok_or(AuthError::NotSignedIn)
    }

    /// Subscribes to auth state changes.
    ///
    /// The stream first yields the current state, then the latest state after
    /// every change. Rapid successive changes may be observed only as the
    /// final one. Each call starts a new, independent sequence. The stream
    /// ends when the session is dropped.
    pub fn subscribe(&self) -> impl Stream<Item = Option<AuthUser>> + Send + 'static {
        let receiver = self.state.subscribe();
        stream::unfold((receiver, true), |(mut receiver, first)| async move {
            if !first {
                receiver.changed().await.ok()?;
            }
            let user = receiver.borrow_and_update().clone();
            Some((user, (receiver, false)))
        })
    }
}
