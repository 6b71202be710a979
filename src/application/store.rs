//! UserSessionStore - Derives and caches the user context from a session.
//!
//! The store observes the identity provider's session and keeps two
//! records for the signed-in user: profile details and the current
//! subscription. Consumers read an immutable [`SessionSnapshot`].
//!
//! # Reconciliation
//!
//! Whenever the session's user or loading flag changes:
//!
//! 1. User present, no fetch in flight, both records absent: fetch both
//!    records concurrently and wait for both to settle. Each fulfilled
//!    query fills its field; each failed query leaves it absent.
//! 2. No user, session resolved, no fetch in flight: clear both records.
//! 3. Anything else: nothing to do.
//!
//! A switch to a different user clears records cached for the previous
//! one before the rule runs. Results that settle after the user changed,
//! or after [`UserSessionStore::shutdown`], are discarded.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::domain::foundation::UserId;
use crate::domain::membership::Subscription;
use crate::domain::session::{Session, SessionSnapshot};
use crate::domain::user::UserDetails;
use crate::ports::{QueryError, SessionSource, SubscriptionReader, UserDetailsReader, UserScope};

/// Mutable state, only touched under the store lock.
#[derive(Debug, Default)]
struct StoreState {
    /// Last session observed, `None` before the first observation.
    session: Option<Session>,
    /// A fetch pair is in flight.
    is_loading: bool,
    user_details: Option<UserDetails>,
    subscription: Option<Subscription>,
    /// User the cached records were fetched for.
    cached_for: Option<UserId>,
}

/// Outcome of evaluating the reconciliation rule.
#[derive(Debug, PartialEq, Eq)]
enum Reconcile {
    Fetch(UserScope),
    Reset,
    Idle,
}

impl StoreState {
    fn current_session(&self) -> Session {
        self.session.clone().unwrap_or_default()
    }

    fn decide(&self) -> Reconcile {
        let session = match &self.session {
            Some(session) => session,
            None => return Reconcile::Idle,
        };

        match UserScope::from_session(session) {
            Some(scope)
                if !self.is_loading
                    && self.user_details.is_none()
                    && self.subscription.is_none() =>
            {
                Reconcile::Fetch(scope)
            }
            None if !session.is_loading && !self.is_loading => Reconcile::Reset,
            _ => Reconcile::Idle,
        }
    }

    fn clear_records(&mut self) {
        self.user_details = None;
        self.subscription = None;
        self.cached_for = None;
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::compose(
            &self.current_session(),
            self.is_loading,
            self.user_details.clone(),
            self.subscription.clone(),
        )
    }
}

struct StoreInner {
    user_reader: Arc<dyn UserDetailsReader>,
    subscription_reader: Arc<dyn SubscriptionReader>,
    state: Mutex<StoreState>,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    busy_tx: watch::Sender<bool>,
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl StoreInner {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes the state; subscribers only wake on an actual change.
    fn publish(&self, state: &StoreState) {
        let next = state.snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        self.busy_tx.send_replace(state.is_loading);
    }
}

/// Session-scoped cache of the signed-in user's profile and subscription.
///
/// Cloning is cheap and yields a handle to the same store. All methods
/// that may start a fetch must be called from within a Tokio runtime.
#[derive(Clone)]
pub struct UserSessionStore {
    inner: Arc<StoreInner>,
}

impl UserSessionStore {
    /// Creates a store that has not observed any session yet.
    pub fn new(
        user_reader: Arc<dyn UserDetailsReader>,
        subscription_reader: Arc<dyn SubscriptionReader>,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(SessionSnapshot::default());
        let (busy_tx, _) = watch::channel(false);

        Self {
            inner: Arc::new(StoreInner {
                user_reader,
                subscription_reader,
                state: Mutex::new(StoreState::default()),
                snapshot_tx,
                busy_tx,
                cancel: CancellationToken::new(),
                tasks: TaskTracker::new(),
            }),
        }
    }

    /// Observes a session value and applies the reconciliation rule.
    ///
    /// The rule only runs when the user or the loading flag differs from
    /// the previous observation (or on the first observation); a token-only
    /// change just republishes the snapshot.
    pub fn reconcile(&self, session: Session) {
        self.apply(session, false);
    }

    fn apply(&self, session: Session, force: bool) {
        if self.inner.cancel.is_cancelled() {
            tracing::debug!("Store is shut down; ignoring session change");
            return;
        }

        let mut state = self.inner.lock();

        let triggers_rule = force
            || match &state.session {
                None => true,
                Some(previous) => {
                    previous.user != session.user || previous.is_loading != session.is_loading
                }
            };

        if let Some(user) = &session.user {
            if state.cached_for.as_ref().is_some_and(|id| id != &user.id) {
                tracing::debug!(user_id = %user.id, "User changed; dropping records of previous user");
                state.clear_records();
            }
        }

        state.session = Some(session);

        if triggers_rule {
            match state.decide() {
                Reconcile::Fetch(scope) => self.start_fetch(&mut state, scope),
                Reconcile::Reset => {
                    if state.user_details.is_some() || state.subscription.is_some() {
                        tracing::debug!("Session signed out; clearing user records");
                    }
                    state.clear_records();
                }
                Reconcile::Idle => {}
            }
        }

        self.inner.publish(&state);
    }

    /// Re-fetches both records for the current user.
    ///
    /// Returns `false` (and does nothing) when nobody is signed in, a fetch
    /// is already in flight, or the store is shut down.
    pub fn refresh(&self) -> bool {
        if self.inner.cancel.is_cancelled() {
            return false;
        }

        let mut state = self.inner.lock();
        let signed_in = state.session.as_ref().is_some_and(Session::is_signed_in);
        if state.is_loading || !signed_in {
            return false;
        }

        state.clear_records();
        let started = match state.decide() {
            Reconcile::Fetch(scope) => {
                self.start_fetch(&mut state, scope);
                true
            }
            _ => false,
        };

        self.inner.publish(&state);
        started
    }

    /// Marks the store busy and spawns the fetch pair. Caller holds the lock.
    fn start_fetch(&self, state: &mut StoreState, scope: UserScope) {
        tracing::debug!(user_id = %scope.user_id, "Fetching user details and subscription");
        state.is_loading = true;

        let store = self.clone();
        self.inner.tasks.spawn(async move {
            store.fetch_pair(scope).await;
        });
    }

    async fn fetch_pair(&self, scope: UserScope) {
        let inner = &self.inner;

        let settled = tokio::select! {
            _ = inner.cancel.cancelled() => None,
            results = async {
                tokio::join!(
                    inner.user_reader.fetch_user_details(&scope),
                    inner.subscription_reader.fetch_current_subscription(&scope),
                )
            } => Some(results),
        };

        let Some((details, subscription)) = settled else {
            tracing::debug!(user_id = %scope.user_id, "Store shut down; dropping in-flight fetches");
            let mut state = inner.lock();
            state.is_loading = false;
            inner.publish(&state);
            return;
        };

        let details = settle("users", &scope, details);
        let subscription = settle("subscriptions", &scope, subscription);

        let rerun = {
            let mut state = inner.lock();
            state.is_loading = false;

            let session_user = state.session.as_ref().and_then(Session::user_id);
            let still_current = session_user == Some(&scope.user_id);

            if still_current {
                state.user_details = details;
                state.subscription = subscription;
                state.cached_for = Some(scope.user_id.clone());
            } else {
                tracing::debug!(user_id = %scope.user_id, "User changed during fetch; discarding results");
            }

            inner.publish(&state);
            (!still_current).then(|| state.current_session())
        };

        if let Some(session) = rerun {
            self.apply(session, true);
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.snapshot_tx.borrow().clone()
    }

    /// Receiver observing every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshot_tx.subscribe()
    }

    /// True while a fetch pair is in flight.
    pub fn is_fetching(&self) -> bool {
        *self.inner.busy_tx.borrow()
    }

    /// Waits until no fetch pair is in flight, or the store is shut down.
    pub async fn wait_idle(&self) {
        let mut busy = self.inner.busy_tx.subscribe();
        tokio::select! {
            _ = self.inner.cancel.cancelled() => {}
            _ = busy.wait_for(|fetching| !*fetching) => {}
        }
    }

    /// Drives the store from a session source.
    ///
    /// Reconciles against the current value, then on every change, until
    /// the source closes or the store is shut down.
    pub async fn run(&self, source: &dyn SessionSource) {
        self.run_with(source.subscribe()).await;
    }

    /// Like [`run`](Self::run), over an already subscribed receiver.
    pub async fn run_with(&self, mut sessions: watch::Receiver<Session>) {
        let initial = sessions.borrow_and_update().clone();
        self.reconcile(initial);

        loop {
            tokio::select! {
                _ = self.inner.cancel.cancelled() => break,
                changed = sessions.changed() => {
                    if changed.is_err() {
                        tracing::debug!("Session source closed");
                        break;
                    }
                    let session = sessions.borrow_and_update().clone();
                    self.reconcile(session);
                }
            }
        }
    }

    /// Signals teardown without waiting.
    ///
    /// In-flight fetches are abandoned and later session changes ignored.
    pub fn cancel(&self) {
        self.inner.cancel.cancel();
        self.inner.tasks.close();
    }

    /// Tears the store down and waits for in-flight fetch tasks to finish.
    pub async fn shutdown(&self) {
        self.cancel();
        self.inner.tasks.wait().await;
    }

    /// True once the store has been torn down.
    pub fn is_shut_down(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }
}

impl std::fmt::Debug for UserSessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSessionStore")
            .field("snapshot", &self.snapshot())
            .field("is_shut_down", &self.is_shut_down())
            .finish()
    }
}

/// Turns a settled query into an optional record, logging failures.
fn settle<T>(relation: &'static str, scope: &UserScope, result: Result<T, QueryError>) -> Option<T> {
    match result {
        Ok(record) => Some(record),
        Err(error) => {
            tracing::warn!(relation, user_id = %scope.user_id, %error, "Record query failed; leaving field empty");
            None
        }
    }
}
