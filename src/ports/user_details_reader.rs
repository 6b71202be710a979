//! User details reader port.
//!
//! Reads the profile row of the signed-in user from the `users` relation.
//!
//! # Example
//!
//! ```ignore
//! async fn greeting(reader: &dyn UserDetailsReader, scope: &UserScope) -> String {
//!     match reader.fetch_user_details(scope).await {
//!         Ok(details) => format!("Hello, {}", details.display_name().unwrap_or_default()),
//!         Err(_) => "Hello".to_string(),
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::user::UserDetails;

use super::{QueryError, UserScope};

/// Single-row query for a user's profile details.
///
/// # Contract
///
/// Implementations must:
/// - Return the row belonging to `scope.user_id`
/// - Return `QueryError::NotSingleRow` if there is no such row
/// - Never retry internally; the caller decides what a failure means
#[async_trait]
pub trait UserDetailsReader: Send + Sync {
    /// Fetch the profile row for the scoped user.
    async fn fetch_user_details(&self, scope: &UserScope) -> Result<UserDetails, QueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use std::collections::HashMap;

    struct TestUserDetailsReader {
        rows: HashMap<String, UserDetails>,
    }

    #[async_trait]
    impl UserDetailsReader for TestUserDetailsReader {
        async fn fetch_user_details(&self, scope: &UserScope) -> Result<UserDetails, QueryError> {
            self.rows
                .get(scope.user_id.as_str())
                .cloned()
                .ok_or(QueryError::NotSingleRow { relation: "users" })
        }
    }

    #[tokio::test]
    async fn reader_returns_row_for_scoped_user() {
        let id = UserId::new("user-123").unwrap();
        let reader = TestUserDetailsReader {
            rows: HashMap::from([("user-123".to_string(), UserDetails::new(id.clone()))]),
        };

        let details = reader
            .fetch_user_details(&UserScope::new(id.clone(), None))
            .await
            .unwrap();
        assert_eq!(details.id, id);
    }

    #[tokio::test]
    async fn reader_reports_missing_row() {
        let reader = TestUserDetailsReader {
            rows: HashMap::new(),
        };

        let result = reader
            .fetch_user_details(&UserScope::new(UserId::new("nobody").unwrap(), None))
            .await;
        assert!(matches!(result, Err(QueryError::NotSingleRow { .. })));
    }

    #[test]
    fn reader_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn UserDetailsReader) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn UserDetailsReader>>();
    }
}
