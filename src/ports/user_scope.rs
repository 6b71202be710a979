//! Identity a record query runs under.

use crate::domain::foundation::{AccessToken, UserId};
use crate::domain::session::Session;

/// Who a record query is for, and the token it is authorized with.
///
/// The token may be absent when a provider reports a user before the
/// token is available; adapters then fall back to anonymous access and
/// row-level security decides what is visible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserScope {
    pub user_id: UserId,
    pub access_token: Option<AccessToken>,
}

impl UserScope {
    pub fn new(user_id: UserId, access_token: Option<AccessToken>) -> Self {
        Self {
            user_id,
            access_token,
        }
    }

    /// Builds a scope for the session's user, if one is signed in.
    pub fn from_session(session: &Session) -> Option<Self> {
        session
            .user
            .as_ref()
            .map(|user| Self::new(user.id.clone(), session.access_token.clone()))
    }
}
