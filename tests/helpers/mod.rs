//! Reusable helpers for integration tests.
//!
//! Every test gets its own in-memory store. [`FlakyStore`] wraps one and
//! fails chosen operations on demand, to exercise the partial failure paths
//! of the contact request flow.

#![allow(dead_code)]

use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

use saferoute_core::auth::AuthUser;
use saferoute_core::config::CoreConfig;
use saferoute_core::store::{
    Document, DocumentStore, Fields, MergeMode, Query, Result, SqliteDocumentStore, StoreError,
};
use saferoute_core::users::ProfileUpdate;
use saferoute_core::SafeRouteCore;

/// Installs a test logger once. Later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A store operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Create,
    Get,
    Update,
    Query,
}

#[derive(Default)]
struct FaultState {
    failing: HashSet<Op>,
    updates_left: Option<usize>,
    calls: Vec<Op>,
}

/// In-memory store that fails selected operations.
pub struct FlakyStore {
    inner: SqliteDocumentStore,
    state: Mutex<FaultState>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: SqliteDocumentStore::in_memory().expect("in-memory store"),
            state: Mutex::new(FaultState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, FaultState> {
        self.state.lock().expect("fault state lock")
    }

    /// Makes every call of `op` fail until [`heal`](Self::heal).
    pub fn fail(&self, op: Op) {
        self.state().failing.insert(op);
    }

    /// Lets `count` more updates succeed, then fails the rest.
    pub fn fail_updates_after(&self, count: usize) {
        self.state().updates_left = Some(count);
    }

    /// Clears every injected failure.
    pub fn heal(&self) {
        let mut state = self.state();
        state.failing.clear();
        state.updates_left = None;
    }

    /// Operations attempted so far, failed ones included.
    pub fn calls(&self) -> Vec<Op> {
        self.state().calls.clone()
    }

    /// Forgets recorded calls.
    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    /// Number of documents in a collection.
    pub fn count(&self, collection: &str) -> usize {
        self.inner.count(collection).expect("count documents")
    }

    fn check(&self, op: Op) -> Result<()> {
        let mut state = self.state();
        state.calls.push(op);

        if state.failing.contains(&op) {
            return Err(StoreError::Unavailable(format!("injected {op:?} failure")));
        }
        if op == Op::Update {
            if let Some(left) = state.updates_left.as_mut() {
                if *left == 0 {
                    return Err(StoreError::Unavailable("injected update failure".to_string()));
                }
                *left -= 1;
            }
        }
        Ok(())
    }
}

impl DocumentStore for FlakyStore {
    fn create(
        &self,
        collection: &str,
        fields: Fields,
    ) -> impl Future<Output = Result<String>> + Send {
        let check = self.check(Op::Create);
        async move {
            check?;
            self.inner.create(collection, fields).await
        }
    }

    fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> impl Future<Output = Result<Option<Fields>>> + Send {
        let check = self.check(Op::Get);
        async move {
            check?;
            self.inner.get(collection, id).await
        }
    }

    fn update(
        &self,
        collection: &str,
        id: &str,
        fields: Fields,
        mode: MergeMode,
    ) -> impl Future<Output = Result<()>> + Send {
        let check = self.check(Op::Update);
        async move {
            check?;
            self.inner.update(collection, id, fields, mode).await
        }
    }

    fn query(
        &self,
        collection: &str,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Document>>> + Send {
        let check = self.check(Op::Query);
        async move {
            check?;
            self.inner.query(collection, query).await
        }
    }
}

/// Builds a core over a shared store with default config.
pub fn core_over<S: DocumentStore>(store: &Arc<S>) -> SafeRouteCore<S> {
    SafeRouteCore::with_store(CoreConfig::new("/unused"), Arc::clone(store)).expect("core")
}

/// The sender of the test scenarios.
pub fn ana() -> AuthUser {
    AuthUser::new("u1")
        .with_display_name("Ana")
        .with_email("ana@example.com")
}

/// The recipient of the test scenarios.
pub fn maria() -> AuthUser {
    AuthUser::new("u2")
        .with_display_name("Maria")
        .with_email("maria@example.com")
}

/// Registers `user` on `core` and saves a complete profile with `phone`.
pub async fn seed_user<S: DocumentStore>(core: &SafeRouteCore<S>, user: AuthUser, phone: &str) {
    let name = user.display_name.clone().unwrap_or_default();
    core.register(user).await.expect("register");
    let notice = core
        .save_profile(
            &ProfileUpdate::new(name)
                .with_phone(phone)
                .with_address("Rua das Flores, 10"),
        )
        .await;
    assert!(!notice.is_error(), "seeding failed: {}", notice.message);
}
