//! User context distribution.
//!
//! A [`UserContextProvider`] makes one store's snapshot visible to all code
//! running inside its scope, without threading a handle through every call.
//! The slot is task-local: each provider scope is independent, nested
//! scopes shadow outer ones, and nothing is process-global.
//!
//! Code that prefers explicit wiring can take a [`UserContext`] handle
//! instead.
//!
//! # Example
//!
//! ```ignore
//! let provider = UserContextProvider::mount(store, source);
//!
//! provider
//!     .scope(async {
//!         let snapshot = use_user()?;
//!         render_header(snapshot.user_details.as_ref());
//!         Ok::<_, ContextError>(())
//!     })
//!     .await?;
//!
//! provider.unmount().await;
//! ```

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::watch;
use tokio::task::futures::TaskLocalFuture;
use tokio::task::JoinHandle;

use crate::domain::session::SessionSnapshot;
use crate::ports::SessionSource;

use super::UserSessionStore;

tokio::task_local! {
    static CURRENT_USER_CONTEXT: UserContext;
}

/// Errors from the context accessors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    /// The accessor ran outside every provider scope.
    #[error("use_user must be used within a UserContextProvider")]
    OutsideProvider,
}

/// Read-only handle to a store's snapshots.
///
/// Cloning is cheap. Holders can read and observe snapshots but have no
/// way to change them.
#[derive(Debug, Clone)]
pub struct UserContext {
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl UserContext {
    /// Creates a handle observing `store`.
    pub fn new(store: &UserSessionStore) -> Self {
        Self {
            snapshots: store.subscribe(),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver observing every later snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Waits until a snapshot satisfies `predicate` and returns it.
    ///
    /// Returns `None` if the store is dropped first.
    pub async fn wait_for(
        &self,
        predicate: impl FnMut(&SessionSnapshot) -> bool,
    ) -> Option<SessionSnapshot> {
        let mut snapshots = self.snapshots.clone();
        let result = snapshots.wait_for(predicate).await;
        result.ok().map(|snapshot| snapshot.clone())
    }

    /// Runs `future` with this handle installed as the current context.
    ///
    /// Use this to carry the context into spawned tasks, which do not
    /// inherit the scope they were spawned from.
    pub fn scope<F: Future>(self, future: F) -> TaskLocalFuture<UserContext, F> {
        CURRENT_USER_CONTEXT.scope(self, future)
    }

    /// Runs `f` with this handle installed as the current context.
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT_USER_CONTEXT.sync_scope(self, f)
    }
}

/// Current snapshot of the enclosing provider.
///
/// # Errors
///
/// Returns `ContextError::OutsideProvider` when called outside every
/// provider scope. This is a wiring mistake, not a runtime condition.
pub fn use_user() -> Result<SessionSnapshot, ContextError> {
    CURRENT_USER_CONTEXT
        .try_with(UserContext::snapshot)
        .map_err(|_| ContextError::OutsideProvider)
}

/// Handle of the enclosing provider, for observing later snapshots.
pub fn use_user_context() -> Result<UserContext, ContextError> {
    CURRENT_USER_CONTEXT
        .try_with(UserContext::clone)
        .map_err(|_| ContextError::OutsideProvider)
}

/// Owns a store for the lifetime of a subtree and scopes its context.
///
/// Dropping the provider tears the store down; prefer
/// [`unmount`](Self::unmount) to also wait for in-flight work.
pub struct UserContextProvider {
    store: UserSessionStore,
    context: UserContext,
    runner: Option<JoinHandle<()>>,
}

impl UserContextProvider {
    /// Wraps a store that the caller drives with `reconcile`.
    pub fn new(store: UserSessionStore) -> Self {
        let context = UserContext::new(&store);
        Self {
            store,
            context,
            runner: None,
        }
    }

    /// Wraps a store and drives it from `source` on a background task.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn mount(store: UserSessionStore, source: Arc<dyn SessionSource>) -> Self {
        let sessions = source.subscribe();
        let runner = {
            let store = store.clone();
            tokio::spawn(async move { store.run_with(sessions).await })
        };

        let context = UserContext::new(&store);
        Self {
            store,
            context,
            runner: Some(runner),
        }
    }

    /// The store this provider owns.
    pub fn store(&self) -> &UserSessionStore {
        &self.store
    }

    /// A handle for explicit dependency injection.
    pub fn context(&self) -> UserContext {
        self.context.clone()
    }

    /// Runs `future` inside this provider's scope.
    pub fn scope<F: Future>(&self, future: F) -> TaskLocalFuture<UserContext, F> {
        self.context().scope(future)
    }

    /// Runs `f` inside this provider's scope.
    pub fn sync_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        self.context().sync_scope(f)
    }

    /// Tears the store down and waits for its background work to finish.
    pub async fn unmount(mut self) {
        self.store.shutdown().await;
        if let Some(runner) = self.runner.take() {
            if let Err(e) = runner.await {
                tracing::warn!(error = %e, "Session runner ended abnormally");
            }
        }
    }
}

impl Drop for UserContextProvider {
    fn drop(&mut self) {
        self.store.cancel();
    }
}

impl std::fmt::Debug for UserContextProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserContextProvider")
            .field("store", &self.store)
            .field("mounted", &self.runner.is_some())
            .finish()
    }
}
