//! Session source port.
//!
//! The identity provider owns the session (sign-in, token refresh,
//! persistence). This port only lets the store observe it: the current
//! value, and a notification whenever it changes.
//!
//! # Example
//!
//! ```ignore
//! let mut sessions = source.subscribe();
//! while sessions.changed().await.is_ok() {
//!     let session = sessions.borrow_and_update().clone();
//!     store.reconcile(session);
//! }
//! ```

use tokio::sync::watch;

use crate::domain::session::Session;

/// Observable authentication session.
///
/// # Contract
///
/// Implementations must:
/// - Publish a new value whenever the user, token or loading flag changes
/// - Close the channel (drop the sender) when the provider shuts down
pub trait SessionSource: Send + Sync {
    /// Current session value.
    fn current(&self) -> Session;

    /// Receiver that observes the current value and every later change.
    fn subscribe(&self) -> watch::Receiver<Session>;
}
