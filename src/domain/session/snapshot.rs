//! Snapshot of the user context handed to consumers.

use serde::Serialize;

use crate::domain::foundation::{AccessToken, SessionUser};
use crate::domain::membership::Subscription;
use crate::domain::user::UserDetails;

use super::Session;

/// Immutable view of the user context at one point in time.
///
/// Consumers only ever receive clones of this value; the store is the
/// single writer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Bearer token of the current session.
    pub access_token: Option<AccessToken>,

    /// Signed-in user.
    pub user: Option<SessionUser>,

    /// Profile row of the signed-in user, once fetched.
    pub user_details: Option<UserDetails>,

    /// True while the session is resolving or a fetch is in flight.
    pub is_loading: bool,

    /// Trialing or active subscription, once fetched.
    pub subscription: Option<Subscription>,
}

impl SessionSnapshot {
    /// Composes a snapshot from the session and the store's cached records.
    pub fn compose(
        session: &Session,
        fetching: bool,
        user_details: Option<UserDetails>,
        subscription: Option<Subscription>,
    ) -> Self {
        Self {
            access_token: session.access_token.clone(),
            user: session.user.clone(),
            user_details,
            is_loading: session.is_loading || fetching,
            subscription,
        }
    }

    /// True when a trialing or active subscription is known.
    pub fn has_active_subscription(&self) -> bool {
        self.subscription
            .as_ref()
            .map_or(false, Subscription::is_current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;

    fn signed_in() -> Session {
        Session::signed_in(
            SessionUser::new(UserId::new("user-123").unwrap(), None, None),
            AccessToken::new("token").unwrap(),
        )
    }

    #[test]
    fn default_snapshot_is_idle_and_empty() {
        let snapshot = SessionSnapshot::default();

        assert!(snapshot.user.is_none());
        assert!(snapshot.user_details.is_none());
        assert!(snapshot.subscription.is_none());
        assert!(!snapshot.is_loading);
        assert!(!snapshot.has_active_subscription());
    }

    #[test]
    fn compose_copies_session_identity() {
        let session = signed_in();
        let snapshot = SessionSnapshot::compose(&session, false, None, None);

        assert_eq!(snapshot.user, session.user);
        assert_eq!(snapshot.access_token, session.access_token);
        assert!(!snapshot.is_loading);
    }

    #[test]
    fn compose_reports_loading_for_either_source() {
        let resolving = Session::loading();
        assert!(SessionSnapshot::compose(&resolving, false, None, None).is_loading);

        let session = signed_in();
        assert!(SessionSnapshot::compose(&session, true, None, None).is_loading);
        assert!(!SessionSnapshot::compose(&session, false, None, None).is_loading);
    }

    #[test]
    fn snapshot_json_redacts_access_token() {
        let snapshot = SessionSnapshot::compose(&signed_in(), false, None, None);
        let json = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(json["access_token"], "[REDACTED]");
        assert_eq!(json["user"]["id"], "user-123");
        assert_eq!(json["is_loading"], false);
    }
}
