//! Typed access to the users collection.

use std::sync::Arc;

use serde_json::Value;

use super::access::{self, AccessDecision, AccessRequirement};
use super::error::{Result, UserError};
use super::types::{ContactSummary, ProfileStatus, ProfileUpdate, UserRecord};
use crate::auth::AuthUser;
use crate::store::{self, DocumentStore, Fields, MergeMode, Query};

/// Reads and writes user records.
///
/// Every method is a single document operation or a single query. Nothing
/// here is atomic across calls; in particular the phone uniqueness check
/// in [`save_profile`](Self::save_profile) can race with a concurrent save.
pub struct UserDirectory<S> {
    store: Arc<S>,
    collection: String,
}

impl<S> Clone for UserDirectory<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
        }
    }
}

impl<S: DocumentStore> UserDirectory<S> {
    /// Creates a directory over the given collection.
    #[must_use]
    pub fn new(store: Arc<S>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Name of the users collection.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn decode(&self, id: String, fields: Fields) -> store::Result<UserRecord> {
        let mut record: UserRecord = store::types::from_fields(&self.collection, &id, fields)?;
        record.id = id;
        Ok(record)
    }

    /// Reads a user record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the document is malformed.
    pub async fn get(&self, uid: &str) -> store::Result<Option<UserRecord>> {
        log::debug!("Reading user {uid}");
        let fields = self.store.get(&self.collection, uid).await?;
        fields
            .map(|fields| self.decode(uid.to_string(), fields))
            .transpose()
    }

    /// Reads a user record that must exist.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NotFound`] if the record does not exist.
    pub async fn require(&self, uid: &str) -> Result<UserRecord> {
        self.get(uid)
            .await?
            .ok_or_else(|| UserError::NotFound(uid.to_string()))
    }

    /// Creates the record of a newly registered user.
    ///
    /// An existing record is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn register(&self, user: &AuthUser) -> store::Result<UserRecord> {
        if let Some(existing) = self.get(&user.uid).await? {
            return Ok(existing);
        }

        let record = UserRecord::registered(user);
        let fields = store::types::to_fields(&record)?;
        self.store
            .update(&self.collection, &user.uid, fields, MergeMode::Replace)
            .await?;

        log::info!("Registered user record {}", user.uid);
        Ok(record)
    }

    async fn find_by(&self, field: &str, value: &str) -> store::Result<Vec<UserRecord>> {
        let query = Query::new().filter_eq(field, value);
        self.store
            .query(&self.collection, &query)
            .await?
            .into_iter()
            .map(|doc| self.decode(doc.id, doc.fields))
            .collect()
    }

    /// Finds users with exactly this email.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn find_by_email(&self, email: &str) -> store::Result<Vec<UserRecord>> {
        self.find_by("email", email).await
    }

    /// Finds users with exactly this phone.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn find_by_phone(&self, phone: &str) -> store::Result<Vec<UserRecord>> {
        self.find_by("phone", phone).await
    }

    /// Adds (or overwrites) one entry of a user's contact map.
    ///
    /// Other contacts are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn add_contact(
        &self,
        owner_id: &str,
        contact: &ContactSummary,
    ) -> store::Result<()> {
        let summary = serde_json::to_value(contact)?;
        let mut contacts = Fields::new();
        contacts.insert(contact.id.clone(), summary);

        let mut fields = Fields::new();
        fields.insert("contacts".to_string(), Value::Object(contacts));

        self.store
            .update(&self.collection, owner_id, fields, MergeMode::Merge)
            .await?;
        log::debug!("Added contact {} to user {owner_id}", contact.id);
        Ok(())
    }

    /// Returns the id of another user who already has this phone.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn phone_owner_other_than(
        &self,
        uid: &str,
        phone: &str,
    ) -> store::Result<Option<String>> {
        Ok(self
            .find_by_phone(phone)
            .await?
            .into_iter()
            .map(|record| record.id)
            .find(|id| id != uid))
    }

    /// Saves the editable profile fields of a user.
    ///
    /// A non-empty phone already used by a different user is rejected.
    /// Contacts, routes and other fields are preserved, and so is the stored
    /// photo when the update carries none.
    ///
    /// # Errors
    ///
    /// Returns [`UserError::NameRequired`] for a blank name,
    /// [`UserError::PhoneInUse`] for a taken phone, or a backend error.
    pub async fn save_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<UserRecord> {
        let update = update.normalized()?;

        if !update.phone.is_empty() {
            if let Some(owner) = self.phone_owner_other_than(uid, &update.phone).await? {
                log::warn!("Phone for user {uid} already belongs to {owner}");
                return Err(UserError::PhoneInUse(update.phone));
            }
        }

        let now = chrono::Utc::now().timestamp_millis();
        let mut fields = Fields::new();
        fields.insert("displayName".to_string(), Value::from(update.display_name));
        fields.insert("phone".to_string(), Value::from(update.phone));
        fields.insert("address".to_string(), Value::from(update.address));
        if let Some(url) = update.photo_url {
            fields.insert("photoURL".to_string(), Value::from(url));
        }
        fields.insert("updatedAt".to_string(), Value::from(now));

        self.store
            .update(&self.collection, uid, fields, MergeMode::Merge)
            .await?;
        log::info!("Saved profile for user {uid}");

        self.require(uid).await
    }

    /// Loads a user's record and checks whether the profile is complete.
    ///
    /// The display name may come from the auth profile when the record has
    /// none.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn profile_status(&self, user: &AuthUser) -> store::Result<ProfileStatus> {
        let record = self.get(&user.uid).await?;
        let complete = access::is_profile_complete(user, record.as_ref());
        Ok(ProfileStatus { record, complete })
    }

    /// Decides whether a page with the given requirement may be shown.
    ///
    /// The user's record is only read when the requirement needs it. A failed
    /// read counts as an empty profile.
    pub async fn check_access(
        &self,
        user: Option<&AuthUser>,
        requirement: AccessRequirement,
    ) -> AccessDecision {
        let record = match (user, requirement) {
            (Some(user), AccessRequirement::CompleteProfile) => {
                match self.get(&user.uid).await {
                    Ok(record) => record,
                    Err(e) => {
                        log::warn!("Failed to load profile for {}: {e}", user.uid);
                        None
                    }
                }
            }
            _ => None,
        };

        access::evaluate(user, record.as_ref(), requirement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteDocumentStore;

    fn directory() -> UserDirectory<SqliteDocumentStore> {
        let store = Arc::new(SqliteDocumentStore::in_memory().unwrap());
        UserDirectory::new(store, "users")
    }

    fn user(uid: &str, email: &str) -> AuthUser {
        AuthUser::new(uid)
            .with_email(email)
            .with_display_name(uid.to_uppercase())
    }

    #[tokio::test]
    async fn register_creates_empty_record() {
        let dir = directory();
        let record = dir.register(&user("u1", "a@b.com")).await.unwrap();
        assert_eq!(record.id, "u1");

        let stored = dir.get("u1").await.unwrap().unwrap();
        assert_eq!(stored.email, "a@b.com");
        assert!(stored.phone.is_empty());
    }

    #[tokio::test]
    async fn register_keeps_existing_record() {
        let dir = directory();
        dir.register(&user("u1", "a@b.com")).await.unwrap();
        dir.save_profile("u1", &ProfileUpdate::new("Ana").with_phone("11912345678"))
            .await
            .unwrap();

        let again = dir.register(&user("u1", "a@b.com")).await.unwrap();
        assert_eq!(again.phone, "11912345678");
    }

    #[tokio::test]
    async fn require_missing_is_not_found() {
        let dir = directory();
        let result = dir.require("ghost").await;
        assert!(matches!(result, Err(UserError::NotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn find_by_email_and_phone() {
        let dir = directory();
        dir.register(&user("u1", "a@b.com")).await.unwrap();
        dir.register(&user("u2", "c@d.com")).await.unwrap();
        dir.save_profile("u2", &ProfileUpdate::new("Bia").with_phone("11912345678"))
            .await
            .unwrap();

        let by_email = dir.find_by_email("a@b.com").await.unwrap();
        assert_eq!(by_email.len(), 1);
        assert_eq!(by_email[0].id, "u1");

        let by_phone = dir.find_by_phone("11912345678").await.unwrap();
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].id, "u2");
    }

    #[tokio::test]
    async fn add_contact_appends() {
        let dir = directory();
        dir.register(&user("u1", "a@b.com")).await.unwrap();
        let u2 = dir.register(&user("u2", "c@d.com")).await.unwrap();
        let u3 = dir.register(&user("u3", "e@f.com")).await.unwrap();

        dir.add_contact("u1", &u2.to_summary(1)).await.unwrap();
        dir.add_contact("u1", &u3.to_summary(2)).await.unwrap();

        let u1 = dir.get("u1").await.unwrap().unwrap();
        assert!(u1.has_contact("u2"));
        assert!(u1.has_contact("u3"));
        assert_eq!(u1.email, "a@b.com");
    }

    #[tokio::test]
    async fn save_profile_rejects_taken_phone() {
        let dir = directory();
        dir.register(&user("u1", "a@b.com")).await.unwrap();
        dir.register(&user("u2", "c@d.com")).await.unwrap();
        dir.save_profile("u1", &ProfileUpdate::new("Ana").with_phone("11912345678"))
            .await
            .unwrap();

        let result = dir
            .save_profile("u2", &ProfileUpdate::new("Bia").with_phone("11912345678"))
            .await;
        assert!(matches!(result, Err(UserError::PhoneInUse(_))));

        let u2 = dir.get("u2").await.unwrap().unwrap();
        assert!(u2.phone.is_empty());
    }

    #[tokio::test]
    async fn save_profile_allows_own_phone() {
        let dir = directory();
        dir.register(&user("u1", "a@b.com")).await.unwrap();
        let update = ProfileUpdate::new("Ana")
            .with_phone("11912345678")
            .with_address("Rua A");
        dir.save_profile("u1", &update).await.unwrap();

        let saved = dir.save_profile("u1", &update).await.unwrap();
        assert!(saved.is_complete());
        assert!(saved.updated_at.is_some());
    }

    #[tokio::test]
    async fn save_profile_preserves_contacts() {
        let dir = directory();
        dir.register(&user("u1", "a@b.com")).await.unwrap();
        let u2 = dir.register(&user("u2", "c@d.com")).await.unwrap();
        dir.add_contact("u1", &u2.to_summary(1)).await.unwrap();

        let saved = dir
            .save_profile("u1", &ProfileUpdate::new("Ana").with_address("Rua B"))
            .await
            .unwrap();
        assert!(saved.has_contact("u2"));
        assert_eq!(saved.address, "Rua B");
    }

    #[tokio::test]
    async fn save_profile_without_photo_keeps_stored_photo() {
        let dir = directory();
        let ana = user("u1", "a@b.com").with_photo_url("https://img/ana.png");
        dir.register(&ana).await.unwrap();

        let saved = dir
            .save_profile("u1", &ProfileUpdate::new("Ana").with_phone("11912345678"))
            .await
            .unwrap();
        assert_eq!(saved.photo_url.as_deref(), Some("https://img/ana.png"));

        let update = ProfileUpdate::new("Ana").with_photo_url("https://img/new.png");
        let replaced = dir.save_profile("u1", &update).await.unwrap();
        assert_eq!(replaced.photo_url.as_deref(), Some("https://img/new.png"));
    }

    #[tokio::test]
    async fn save_profile_keeps_routes() {
        let dir = directory();
        let mut fields = Fields::new();
        fields.insert(
            "routes".to_string(),
            serde_json::json!([{"name": "Casa", "origin": "Rua A", "destination": "Rua B"}]),
        );
        dir.store
            .update("users", "u1", fields, MergeMode::Replace)
            .await
            .unwrap();

        let saved = dir
            .save_profile("u1", &ProfileUpdate::new("Ana").with_address("Rua A"))
            .await
            .unwrap();
        assert_eq!(saved.routes.len(), 1);
        assert_eq!(saved.routes[0].name.as_deref(), Some("Casa"));
    }

    #[tokio::test]
    async fn profile_status_reports_completeness() {
        let dir = directory();
        let ana = user("u1", "a@b.com");

        let missing = dir.profile_status(&ana).await.unwrap();
        assert!(missing.record.is_none());
        assert!(!missing.complete);

        dir.register(&ana).await.unwrap();
        dir.save_profile(
            "u1",
            &ProfileUpdate::new("Ana")
                .with_phone("11912345678")
                .with_address("Rua A"),
        )
        .await
        .unwrap();
        let status = dir.profile_status(&ana).await.unwrap();
        assert!(status.complete);
        assert_eq!(status.record.unwrap().address, "Rua A");
    }

    #[tokio::test]
    async fn check_access_paths() {
        let dir = directory();
        let ana = user("u1", "a@b.com");
        dir.register(&ana).await.unwrap();

        assert_eq!(
            dir.check_access(None, AccessRequirement::SignedIn).await,
            AccessDecision::RedirectToLogin
        );
        assert_eq!(
            dir.check_access(Some(&ana), AccessRequirement::SignedIn)
                .await,
            AccessDecision::Allow
        );
        assert_eq!(
            dir.check_access(Some(&ana), AccessRequirement::CompleteProfile)
                .await,
            AccessDecision::RedirectToCompleteProfile
        );

        dir.save_profile(
            "u1",
            &ProfileUpdate::new("Ana")
                .with_phone("11912345678")
                .with_address("Rua A"),
        )
        .await
        .unwrap();
        assert_eq!(
            dir.check_access(Some(&ana), AccessRequirement::CompleteProfile)
                .await,
            AccessDecision::Allow
        );
    }
}
