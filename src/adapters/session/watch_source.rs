//! Session source backed by a `tokio::sync::watch` channel.
//!
//! The identity provider integration owns a `WatchSessionSource` and
//! publishes every session transition to it; stores subscribe through the
//! `SessionSource` port.

use tokio::sync::watch;

use crate::domain::foundation::{AccessToken, SessionUser};
use crate::domain::session::Session;
use crate::ports::SessionSource;

/// Publishes session values to any number of subscribers.
#[derive(Debug)]
pub struct WatchSessionSource {
    sender: watch::Sender<Session>,
}

impl WatchSessionSource {
    /// Creates a source holding `initial`.
    pub fn new(initial: Session) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Creates a source that has not resolved the session yet.
    pub fn resolving() -> Self {
        Self::new(Session::loading())
    }

    /// Publishes a new session value.
    ///
    /// Subscribers are only notified when the value actually changed.
    pub fn publish(&self, session: Session) {
        self.sender.send_if_modified(|current| {
            if *current == session {
                false
            } else {
                *current = session;
                true
            }
        });
    }

    /// Publishes a resolved session for a signed-in user.
    pub fn sign_in(&self, user: SessionUser, access_token: AccessToken) {
        self.publish(Session::signed_in(user, access_token));
    }

    /// Publishes a resolved, signed-out session.
    pub fn sign_out(&self) {
        self.publish(Session::signed_out());
    }

    /// Replaces the token of the current session (token refresh).
    pub fn refresh_token(&self, access_token: AccessToken) {
        let mut session = self.current();
        session.access_token = Some(access_token);
        self.publish(session);
    }

    /// Marks the current session as resolving.
    pub fn begin_loading(&self) {
        let mut session = self.current();
        session.is_loading = true;
        self.publish(session);
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl SessionSource for WatchSessionSource {
    fn current(&self) -> Session {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.sender.subscribe()
    }
}
