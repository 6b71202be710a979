//! Profile row of the `users` relation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::UserId;

/// Profile details of a user.
///
/// Mirrors the `users` relation. Address and payment method are stored as
/// JSON by the billing sync and are kept opaque here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDetails {
    /// Same id as the auth user the row belongs to.
    pub id: UserId,

    #[serde(default)]
    pub first_name: Option<String>,

    #[serde(default)]
    pub last_name: Option<String>,

    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub avatar_url: Option<String>,

    /// Customer's billing address.
    #[serde(default)]
    pub billing_address: Option<Value>,

    /// Customer's default payment instrument.
    #[serde(default)]
    pub payment_method: Option<Value>,
}

impl UserDetails {
    /// Creates a profile with only the id set.
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            first_name: None,
            last_name: None,
            full_name: None,
            avatar_url: None,
            billing_address: None,
            payment_method: None,
        }
    }

    /// Sets the full name.
    pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
        self.full_name = Some(full_name.into());
        self
    }

    /// Best available name: `full_name`, else first and last joined.
    pub fn display_name(&self) -> Option<String> {
        if let Some(full) = self.full_name.as_deref().filter(|s| !s.trim().is_empty()) {
            return Some(full.to_string());
        }

        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.trim().is_empty())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_row_with_missing_optional_columns() {
        let details: UserDetails = serde_json::from_value(json!({
            "id": "user-123",
            "full_name": "Ada Lovelace",
            "avatar_url": null
        }))
        .unwrap();

        assert_eq!(details.id.as_str(), "user-123");
        assert_eq!(details.full_name.as_deref(), Some("Ada Lovelace"));
        assert!(details.avatar_url.is_none());
        assert!(details.billing_address.is_none());
    }

    #[test]
    fn ignores_unknown_columns_and_keeps_json_blobs() {
        let details: UserDetails = serde_json::from_value(json!({
            "id": "user-123",
            "billing_address": { "city": "London", "country": "GB" },
            "payment_method": { "type": "card", "card": { "last4": "4242" } },
            "updated_at": "2024-01-15T10:30:00Z"
        }))
        .unwrap();

        assert_eq!(details.billing_address.unwrap()["city"], "London");
        assert_eq!(details.payment_method.unwrap()["card"]["last4"], "4242");
    }

    #[test]
    fn display_name_prefers_full_name() {
        let details = UserDetails::new(UserId::new("user-123").unwrap()).with_full_name("Ada Lovelace");
        assert_eq!(details.display_name().as_deref(), Some("Ada Lovelace"));
    }

    #[test]
    fn display_name_joins_first_and_last() {
        let mut details = UserDetails::new(UserId::new("user-123").unwrap());
        details.first_name = Some("Ada".to_string());
        details.last_name = Some("Lovelace".to_string());
        assert_eq!(details.display_name().as_deref(), Some("Ada Lovelace"));

        details.last_name = None;
        assert_eq!(details.display_name().as_deref(), Some("Ada"));
    }

    #[test]
    fn display_name_is_none_without_names() {
        let details = UserDetails::new(UserId::new("user-123").unwrap());
        assert!(details.display_name().is_none());
    }
}
