//! User record types.
//!
//! These mirror the documents of the users collection. Field names on the
//! wire are camelCase (`displayName`, `photoURL`, `addedAt`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::{Result, UserError};
use crate::auth::AuthUser;

/// Name shown for a user who never set one.
pub const FALLBACK_DISPLAY_NAME: &str = "Usuário";

/// Number of routes listed as recent on the profile page.
pub const RECENT_ROUTES_SHOWN: usize = 6;

/// A contact as stored in another user's contact map.
///
/// This is a snapshot taken when the contact was added; it is not kept in
/// sync with the contact's own record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSummary {
    /// User id of the contact.
    pub id: String,
    /// Display name at the time of adding.
    pub name: String,
    /// Email at the time of adding.
    #[serde(default)]
    pub email: String,
    /// Phone at the time of adding.
    #[serde(default)]
    pub phone: String,
    /// Photo URL at the time of adding.
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    /// When the contact was added (Unix milliseconds).
    pub added_at: i64,
}

/// A saved route of a user.
///
/// Routes are written by the route planner; every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    /// Route name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Where the route starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    /// Where the route ends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
    /// When the route was saved (Unix milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<i64>,
}

impl RouteSummary {
    /// Route name, or "Rota N" for the route at `index` (zero-based).
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Rota {}", index + 1),
        }
    }
}

/// One user's record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Record id, equal to the auth user id. Not part of the stored body.
    #[serde(skip)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
    /// Email.
    #[serde(default)]
    pub email: String,
    /// Phone; unique across users when non-empty (checked on save).
    #[serde(default)]
    pub phone: String,
    /// Free-form address.
    #[serde(default)]
    pub address: String,
    /// Profile photo URL.
    #[serde(rename = "photoURL", default)]
    pub photo_url: Option<String>,
    /// Contacts keyed by contact user id.
    #[serde(default)]
    pub contacts: BTreeMap<String, ContactSummary>,
    /// Saved routes, oldest first.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteSummary>,
    /// Last profile save (Unix milliseconds).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

impl UserRecord {
    /// Creates the empty record written at registration.
    #[must_use]
    pub fn registered(user: &AuthUser) -> Self {
        Self {
            id: user.uid.clone(),
            display_name: user.display_name.clone().unwrap_or_default(),
            email: user.email.clone().unwrap_or_default(),
            photo_url: user.photo_url.clone(),
            ..Self::default()
        }
    }

    /// Returns whether display name, phone and address are all set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        [&self.display_name, &self.phone, &self.address]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    /// Display name, or the generic fallback when blank.
    #[must_use]
    pub fn display_name_or_fallback(&self) -> &str {
        let name = self.display_name.trim();
        if name.is_empty() {
            FALLBACK_DISPLAY_NAME
        } else {
            name
        }
    }

    /// Returns whether `contact_id` is in this user's contacts.
    #[must_use]
    pub fn has_contact(&self, contact_id: &str) -> bool {
        self.contacts.contains_key(contact_id)
    }

    /// Contacts sorted by name, then id.
    #[must_use]
    pub fn contacts_by_name(&self) -> Vec<&ContactSummary> {
        let mut contacts: Vec<&ContactSummary> = self.contacts.values().collect();
        contacts.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        contacts
    }

    /// The first routes, as listed on the profile page.
    #[must_use]
    pub fn recent_routes(&self) -> &[RouteSummary] {
        &self.routes[..self.routes.len().min(RECENT_ROUTES_SHOWN)]
    }

    /// Builds the summary other users store for this user.
    #[must_use]
    pub fn to_summary(&self, added_at: i64) -> ContactSummary {
        ContactSummary {
            id: self.id.clone(),
            name: self.display_name_or_fallback().to_string(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            photo_url: self.photo_url.clone(),
            added_at,
        }
    }
}

/// A user's record together with its completeness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileStatus {
    /// The stored record, if any.
    pub record: Option<UserRecord>,
    /// Whether the profile has name, phone and address.
    pub complete: bool,
}

/// Editable profile fields.
///
/// Email is owned by the auth service and is not editable here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name (required).
    pub display_name: String,
    /// New phone.
    pub phone: String,
    /// New address.
    pub address: String,
    /// New photo URL; `None` keeps the stored one.
    pub photo_url: Option<String>,
}

impl ProfileUpdate {
    /// Creates an update with the given display name.
    #[must_use]
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Sets the phone.
    #[must_use]
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Sets the address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Sets the photo URL.
    #[must_use]
    pub fn with_photo_url(mut self, url: impl Into<String>) -> Self {
        self.photo_url = Some(url.into());
        self
    }

    /// Trims every field and checks that the display name is present.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NameRequired`] if the display name is blank.
    pub fn normalized(&self) -> Result<Self> {
        let display_name = self.display_name.trim();
        if display_name.is_empty() {
            return Err(UserError::NameRequired);
        }

        Ok(Self {
            display_name: display_name.to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
            photo_url: self
                .photo_url
                .as_deref()
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(ToString::to_string),
        })
    }
}
