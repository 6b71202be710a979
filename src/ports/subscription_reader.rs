//! Subscription reader port.
//!
//! Reads the user's current subscription (status `trialing` or `active`)
//! with its price and product embedded.

use async_trait::async_trait;

use crate::domain::membership::Subscription;

use super::{QueryError, UserScope};

/// Single-row query for the scoped user's current subscription.
///
/// # Contract
///
/// Implementations must:
/// - Only consider rows whose status is in `SubscriptionStatus::CURRENT`
/// - Embed the price (and its product) when the backend has them
/// - Return `QueryError::NotSingleRow` when zero or several rows match
#[async_trait]
pub trait SubscriptionReader: Send + Sync {
    /// Fetch the trialing or active subscription of the scoped user.
    async fn fetch_current_subscription(
        &self,
        scope: &UserScope,
    ) -> Result<Subscription, QueryError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reader_trait_is_object_safe_and_send_sync() {
        fn _assert_trait_object(_: &dyn SubscriptionReader) {}
        fn _assert_arc_send_sync<T: Send + Sync + ?Sized>() {}
        _assert_arc_send_sync::<std::sync::Arc<dyn SubscriptionReader>>();
    }
}
