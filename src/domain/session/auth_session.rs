//! Authentication session as supplied by the identity provider.

use crate::domain::foundation::{AccessToken, SessionUser, UserId};

/// Read-only view of the identity provider's session.
///
/// The store never mutates a `Session`; it only reacts to new values
/// published by a `SessionSource`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    /// Signed-in user, absent when signed out.
    pub user: Option<SessionUser>,

    /// Bearer token of the session, absent when signed out.
    pub access_token: Option<AccessToken>,

    /// True while the provider is still resolving the session
    /// (restoring from storage, refreshing, exchanging a code).
    pub is_loading: bool,
}

impl Session {
    /// A resolved session with nobody signed in.
    pub fn signed_out() -> Self {
        Self::default()
    }

    /// A session the provider has not resolved yet.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    /// A resolved session for a signed-in user.
    pub fn signed_in(user: SessionUser, access_token: AccessToken) -> Self {
        Self {
            user: Some(user),
            access_token: Some(access_token),
            is_loading: false,
        }
    }

    /// Returns the signed-in user's id, if any.
    pub fn user_id(&self) -> Option<&UserId> {
        self.user.as_ref().map(|u| &u.id)
    }

    /// True when a user is present.
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> SessionUser {
        SessionUser::new(
            UserId::new("user-123").unwrap(),
            Some("test@example.com".to_string()),
            None,
        )
    }

    #[test]
    fn signed_out_session_is_resolved_and_empty() {
        let session = Session::signed_out();

        assert!(!session.is_signed_in());
        assert!(!session.is_loading);
        assert!(session.access_token.is_none());
        assert!(session.user_id().is_none());
    }

    #[test]
    fn loading_session_has_no_user() {
        let session = Session::loading();

        assert!(session.is_loading);
        assert!(!session.is_signed_in());
    }

    #[test]
    fn signed_in_session_exposes_user_id() {
        let session = Session::signed_in(test_user(), AccessToken::new("token").unwrap());

        assert!(session.is_signed_in());
        assert_eq!(session.user_id().map(UserId::as_str), Some("user-123"));
    }
}
