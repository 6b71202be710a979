//! Authentication types for the domain layer.
//!
//! These types describe the identity and bearer token handed to us by the
//! external identity provider. They have **no provider dependencies** - any
//! session source can populate them via the `SessionSource` port.
//!
//! # Design Decisions
//!
//! - `SessionUser` contains only the claims we actually use
//! - `AccessToken` never prints its value through `Debug` or `Serialize`
//! - Types are `Clone` so snapshots can be handed out freely

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

use super::{UserId, ValidationError};

/// Identity of the signed-in user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// The unique user identifier from the auth provider.
    pub id: UserId,

    /// Email address, absent for phone or anonymous sign-ins.
    #[serde(default)]
    pub email: Option<String>,

    /// Display name if the provider supplies one.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl SessionUser {
    /// Creates a new session user.
    pub fn new(id: UserId, email: Option<String>, display_name: Option<String>) -> Self {
        Self {
            id,
            email,
            display_name,
        }
    }

    /// Returns the display name, falling back to the email, then the id.
    pub fn display_label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.id.as_str())
    }
}

/// Bearer token of the current session.
///
/// Redacted in `Debug` and `Serialize` output; use [`AccessToken::expose`]
/// when building an outgoing `Authorization` header.
#[derive(Clone)]
pub struct AccessToken(SecretString);

impl AccessToken {
    /// Wraps a raw bearer token, rejecting empty values.
    pub fn new(token: impl Into<String>) -> Result<Self, ValidationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(ValidationError::blank("access_token"));
        }
        Ok(Self(SecretString::new(token)))
    }

    /// Returns the raw token.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl PartialEq for AccessToken {
    fn eq(&self, other: &Self) -> bool {
        self.expose() == other.expose()
    }
}

impl Eq for AccessToken {}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl Serialize for AccessToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user_id() -> UserId {
        UserId::new("user-123").unwrap()
    }

    #[test]
    fn display_label_prefers_name_then_email_then_id() {
        let named = SessionUser::new(
            test_user_id(),
            Some("alice@example.com".to_string()),
            Some("Alice".to_string()),
        );
        assert_eq!(named.display_label(), "Alice");

        let email_only = SessionUser::new(test_user_id(), Some("bob@example.com".to_string()), None);
        assert_eq!(email_only.display_label(), "bob@example.com");

        let bare = SessionUser::new(test_user_id(), None, None);
        assert_eq!(bare.display_label(), "user-123");
    }

    #[test]
    fn access_token_rejects_empty_value() {
        assert!(AccessToken::new("").is_err());
    }

    #[test]
    fn access_token_is_redacted_in_debug_and_json() {
        let token = AccessToken::new("eyJhbGciOiJIUzI1NiJ9.secret").unwrap();

        assert_eq!(format!("{:?}", token), "AccessToken([REDACTED])");
        assert_eq!(serde_json::to_string(&token).unwrap(), "\"[REDACTED]\"");
        assert_eq!(token.expose(), "eyJhbGciOiJIUzI1NiJ9.secret");
    }

    #[test]
    fn access_tokens_compare_by_value() {
        let a = AccessToken::new("token-a").unwrap();
        assert_eq!(a, AccessToken::new("token-a").unwrap());
        assert_ne!(a, AccessToken::new("token-b").unwrap());
    }
}
