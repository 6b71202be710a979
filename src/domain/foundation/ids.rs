//! Identifier of an authenticated user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Id the identity provider assigned to a user.
///
/// The `users` and `subscriptions` relations key their rows by the same
/// value, so it is kept as an opaque string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ValidationError::blank("user_id"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for UserId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_provider_id_verbatim() {
        let id: UserId = "0b6f6c1e-7d7a-4c9e-9f1b-3f8f2d2a9c11".parse().unwrap();
        assert_eq!(id.to_string(), "0b6f6c1e-7d7a-4c9e-9f1b-3f8f2d2a9c11");
    }

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!(UserId::new(""), Err(ValidationError::blank("user_id")));
        assert!(UserId::new(" \t").is_err());
    }

    #[test]
    fn round_trips_as_json_string() {
        let id = UserId::new("user-123").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"user-123\"");
        assert_eq!(serde_json::from_str::<UserId>(&json).unwrap(), id);
    }
}
