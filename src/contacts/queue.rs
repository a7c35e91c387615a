//! Typed access to the contact requests collection.

use std::sync::Arc;

use serde_json::Value;

use super::types::{ContactRequest, RequestStatus};
use crate::store::{self, Direction, DocumentStore, Fields, MergeMode, Query};

/// Reads and writes contact request documents.
pub struct RequestQueue<S> {
    store: Arc<S>,
    collection: String,
}

impl<S> Clone for RequestQueue<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collection: self.collection.clone(),
        }
    }
}

impl<S: DocumentStore> RequestQueue<S> {
    /// Creates a queue over the given collection.
    #[must_use]
    pub fn new(store: Arc<S>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Name of the requests collection.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    fn decode(&self, id: String, fields: Fields) -> store::Result<ContactRequest> {
        let mut request: ContactRequest = store::types::from_fields(&self.collection, &id, fields)?;
        request.id = id;
        Ok(request)
    }

    async fn run(&self, query: Query) -> store::Result<Vec<ContactRequest>> {
        self.store
            .query(&self.collection, &query)
            .await?
            .into_iter()
            .map(|doc| self.decode(doc.id, doc.fields))
            .collect()
    }

    /// Stores a new request and returns it with its generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn create(&self, request: &ContactRequest) -> store::Result<ContactRequest> {
        let fields = store::types::to_fields(request)?;
        let id = self.store.create(&self.collection, fields).await?;
        log::debug!(
            "Created request {id} from {} to {}",
            request.from_user_id,
            request.to_user_id
        );
        Ok(ContactRequest {
            id,
            ..request.clone()
        })
    }

    /// Reads one request.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the document is malformed.
    pub async fn get(&self, id: &str) -> store::Result<Option<ContactRequest>> {
        self.store
            .get(&self.collection, id)
            .await?
            .map(|fields| self.decode(id.to_string(), fields))
            .transpose()
    }

    /// Pending requests from `from` to `to`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn pending_between(
        &self,
        from: &str,
        to: &str,
    ) -> store::Result<Vec<ContactRequest>> {
        let query = Query::new()
            .filter_eq("fromUserId", from)
            .filter_eq("toUserId", to)
            .filter_eq("status", RequestStatus::Pending.as_str());
        self.run(query).await
    }

    /// Pending requests addressed to `recipient`, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn pending_for(&self, recipient: &str) -> store::Result<Vec<ContactRequest>> {
        let query = Query::new()
            .filter_eq("toUserId", recipient)
            .filter_eq("status", RequestStatus::Pending.as_str())
            .order_by("createdAt", Direction::Descending);
        self.run(query).await
    }

    /// Writes a new status and resolution time into a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub async fn set_status(
        &self,
        id: &str,
        status: RequestStatus,
        resolved_at: i64,
    ) -> store::Result<()> {
        let mut fields = Fields::new();
        fields.insert("status".to_string(), Value::from(status.as_str()));
        fields.insert("resolvedAt".to_string(), Value::from(resolved_at));

        self.store
            .update(&self.collection, id, fields, MergeMode::Merge)
            .await?;
        log::debug!("Request {id} is now {status}");
        Ok(())
    }
}
