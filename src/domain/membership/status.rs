//! Subscription status as mirrored from the billing provider.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a subscription.
///
/// Values match the billing provider's `subscription.status` strings and
/// the `subscription_status` enum of the backend schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// In a free trial period.
    Trialing,

    /// Paid and current.
    Active,

    /// Cancelled; no further invoices.
    Canceled,

    /// First invoice not yet paid.
    Incomplete,

    /// First invoice never paid within the allowed window.
    IncompleteExpired,

    /// Latest invoice failed; provider is retrying.
    PastDue,

    /// Retries exhausted; invoices remain open.
    Unpaid,

    /// Trial ended without a payment method.
    Paused,
}

impl SubscriptionStatus {
    /// Statuses that count as a current subscription for the user context.
    pub const CURRENT: [SubscriptionStatus; 2] =
        [SubscriptionStatus::Trialing, SubscriptionStatus::Active];

    /// Returns true for `trialing` and `active`.
    pub fn is_current(&self) -> bool {
        Self::CURRENT.contains(self)
    }

    /// The wire value used in backend filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trialing => "trialing",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Incomplete => "incomplete",
            SubscriptionStatus::IncompleteExpired => "incomplete_expired",
            SubscriptionStatus::PastDue => "past_due",
            SubscriptionStatus::Unpaid => "unpaid",
            SubscriptionStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_trialing_and_active_are_current() {
        assert!(SubscriptionStatus::Trialing.is_current());
        assert!(SubscriptionStatus::Active.is_current());

        assert!(!SubscriptionStatus::Canceled.is_current());
        assert!(!SubscriptionStatus::Incomplete.is_current());
        assert!(!SubscriptionStatus::IncompleteExpired.is_current());
        assert!(!SubscriptionStatus::PastDue.is_current());
        assert!(!SubscriptionStatus::Unpaid.is_current());
        assert!(!SubscriptionStatus::Paused.is_current());
    }

    #[test]
    fn as_str_matches_serde_representation() {
        for status in [
            SubscriptionStatus::Trialing,
            SubscriptionStatus::Active,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::Incomplete,
            SubscriptionStatus::IncompleteExpired,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Unpaid,
            SubscriptionStatus::Paused,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn deserializes_provider_values() {
        let status: SubscriptionStatus = serde_json::from_str("\"past_due\"").unwrap();
        assert_eq!(status, SubscriptionStatus::PastDue);
    }
}
