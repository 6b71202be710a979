//! In-memory implementation of the record reader ports.
//!
//! # Example
//!
//! ```ignore
//! use user_context::adapters::memory::InMemoryRecordStore;
//!
//! let records = Arc::new(
//!     InMemoryRecordStore::new()
//!         .with_user_details(details)
//!         .with_subscription(subscription),
//! );
//!
//! // Hold fetches in flight to observe the loading state
//! records.hold();
//! store.reconcile(session);
//! assert!(store.snapshot().is_loading);
//! records.release();
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::foundation::UserId;
use crate::domain::membership::Subscription;
use crate::domain::user::UserDetails;
use crate::ports::{QueryError, SubscriptionReader, UserDetailsReader, UserScope};

/// Record store keyed by user id.
///
/// Besides serving rows it counts issued queries, can force either query
/// to fail, and can hold queries in flight until released.
///
/// # Panics
///
/// Methods panic if an internal lock is poisoned.
#[derive(Debug)]
pub struct InMemoryRecordStore {
    user_details: RwLock<HashMap<UserId, UserDetails>>,
    subscriptions: RwLock<HashMap<UserId, Subscription>>,
    user_details_error: RwLock<Option<QueryError>>,
    subscription_error: RwLock<Option<QueryError>>,
    user_details_calls: AtomicUsize,
    subscription_calls: AtomicUsize,
    /// `true` while queries may complete.
    gate: watch::Sender<bool>,
}

impl InMemoryRecordStore {
    /// Creates an empty store with the gate open.
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            user_details: RwLock::new(HashMap::new()),
            subscriptions: RwLock::new(HashMap::new()),
            user_details_error: RwLock::new(None),
            subscription_error: RwLock::new(None),
            user_details_calls: AtomicUsize::new(0),
            subscription_calls: AtomicUsize::new(0),
            gate,
        }
    }

    /// Adds a profile row.
    pub fn with_user_details(self, details: UserDetails) -> Self {
        self.insert_user_details(details);
        self
    }

    /// Adds a subscription row for its `user_id`.
    pub fn with_subscription(self, subscription: Subscription) -> Self {
        self.insert_subscription(subscription);
        self
    }

    /// Inserts or replaces a profile row at runtime.
    pub fn insert_user_details(&self, details: UserDetails) {
        self.user_details
            .write()
            .expect("InMemoryRecordStore: lock poisoned")
            .insert(details.id.clone(), details);
    }

    /// Inserts or replaces a subscription row at runtime.
    pub fn insert_subscription(&self, subscription: Subscription) {
        self.subscriptions
            .write()
            .expect("InMemoryRecordStore: lock poisoned")
            .insert(subscription.user_id.clone(), subscription);
    }

    /// Removes a user's subscription row.
    pub fn remove_subscription(&self, user_id: &UserId) {
        self.subscriptions.write().expect("InMemoryRecordStore: lock poisoned").remove(user_id);
    }

    /// Forces every profile query to fail with `error`.
    pub fn fail_user_details(&self, error: QueryError) {
        *self.user_details_error.write().expect("InMemoryRecordStore: lock poisoned") = Some(error);
    }

    /// Forces every subscription query to fail with `error`.
    pub fn fail_subscription(&self, error: QueryError) {
        *self.subscription_error.write().expect("InMemoryRecordStore: lock poisoned") = Some(error);
    }

    /// Clears forced errors and returns to normal operation.
    pub fn clear_errors(&self) {
        *self.user_details_error.write().expect("InMemoryRecordStore: lock poisoned") = None;
        *self.subscription_error.write().expect("InMemoryRecordStore: lock poisoned") = None;
    }

    /// Holds queries issued from now on until [`release`](Self::release).
    pub fn hold(&self) {
        self.gate.send_replace(false);
    }

    /// Lets held and future queries complete.
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    /// Number of profile queries issued so far.
    pub fn user_details_calls(&self) -> usize {
        self.user_details_calls.load(Ordering::SeqCst)
    }

    /// Number of subscription queries issued so far.
    pub fn subscription_calls(&self) -> usize {
        self.subscription_calls.load(Ordering::SeqCst)
    }

    async fn pass_gate(&self) {
        let mut gate = self.gate.subscribe();
        // The sender lives as long as `self`, so this only returns once open.
        let _ = gate.wait_for(|open| *open).await;
    }
}

impl Default for InMemoryRecordStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserDetailsReader for InMemoryRecordStore {
    async fn fetch_user_details(&self, scope: &UserScope) -> Result<UserDetails, QueryError> {
        self.user_details_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;

        if let Some(error) = self.user_details_error.read().expect("InMemoryRecordStore: lock poisoned").clone() {
            return Err(error);
        }

        self.user_details
            .read()
            .expect("InMemoryRecordStore: lock poisoned")
            .get(&scope.user_id)
            .cloned()
            .ok_or(QueryError::NotSingleRow { relation: "users" })
    }
}

#[async_trait]
impl SubscriptionReader for InMemoryRecordStore {
    async fn fetch_current_subscription(
        &self,
        scope: &UserScope,
    ) -> Result<Subscription, QueryError> {
        self.subscription_calls.fetch_add(1, Ordering::SeqCst);
        self.pass_gate().await;

        if let Some(error) = self.subscription_error.read().expect("InMemoryRecordStore: lock poisoned").clone() {
            return Err(error);
        }

        self.subscriptions
            .read()
            .expect("InMemoryRecordStore: lock poisoned")
            .get(&scope.user_id)
            .filter(|s| s.is_current())
            .cloned()
            .ok_or(QueryError::NotSingleRow {
                relation: "subscriptions",
            })
    }
}
