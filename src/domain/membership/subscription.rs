//! Subscription, price and product records.
//!
//! These mirror the `subscriptions`, `prices` and `products` relations that
//! the billing webhook sync keeps up to date. A subscription row is read
//! with its price embedded, and the price with its product embedded.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{Timestamp, UserId};

use super::SubscriptionStatus;

/// A user's subscription with its embedded price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Billing provider's subscription id (`sub_...`).
    pub id: String,

    pub user_id: UserId,

    pub status: SubscriptionStatus,

    #[serde(default)]
    pub metadata: Option<Value>,

    #[serde(default)]
    pub price_id: Option<String>,

    #[serde(default)]
    pub quantity: Option<u32>,

    /// Whether the subscription ends at the end of the current period.
    #[serde(default)]
    pub cancel_at_period_end: Option<bool>,

    pub created: Timestamp,

    pub current_period_start: Timestamp,

    pub current_period_end: Timestamp,

    #[serde(default)]
    pub ended_at: Option<Timestamp>,

    #[serde(default)]
    pub cancel_at: Option<Timestamp>,

    #[serde(default)]
    pub canceled_at: Option<Timestamp>,

    #[serde(default)]
    pub trial_start: Option<Timestamp>,

    #[serde(default)]
    pub trial_end: Option<Timestamp>,

    /// Embedded price row.
    #[serde(default)]
    pub prices: Option<Price>,
}

impl Subscription {
    /// True for `trialing` and `active` subscriptions.
    pub fn is_current(&self) -> bool {
        self.status.is_current()
    }

    /// True while the trial has not ended at `now`.
    pub fn is_trialing_at(&self, now: &Timestamp) -> bool {
        self.status == SubscriptionStatus::Trialing
            && self.trial_end.map_or(true, |end| end.is_after(now))
    }

    /// True when the subscription will not renew.
    pub fn will_cancel(&self) -> bool {
        self.cancel_at_period_end.unwrap_or(false) || self.cancel_at.is_some()
    }

    /// Name of the subscribed product, when the price and product are embedded.
    pub fn product_name(&self) -> Option<&str> {
        self.prices
            .as_ref()
            .and_then(|p| p.products.as_ref())
            .and_then(|p| p.name.as_deref())
    }
}

/// A price of a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    /// Billing provider's price id (`price_...`).
    pub id: String,

    #[serde(default)]
    pub product_id: Option<String>,

    #[serde(default)]
    pub active: Option<bool>,

    #[serde(default)]
    pub description: Option<String>,

    /// Amount in the smallest currency unit (cents for USD).
    #[serde(default)]
    pub unit_amount: Option<i64>,

    /// Three-letter ISO currency code, lowercase.
    #[serde(default)]
    pub currency: Option<String>,

    #[serde(rename = "type", default)]
    pub pricing_type: Option<PricingType>,

    #[serde(default)]
    pub interval: Option<PricingPlanInterval>,

    #[serde(default)]
    pub interval_count: Option<u32>,

    #[serde(default)]
    pub trial_period_days: Option<u32>,

    #[serde(default)]
    pub metadata: Option<Value>,

    /// Embedded product row.
    #[serde(default)]
    pub products: Option<Product>,
}

/// A product sold through the billing provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Billing provider's product id (`prod_...`).
    pub id: String,

    #[serde(default)]
    pub active: Option<bool>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub metadata: Option<Value>,
}

/// Whether a price is charged once or on a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    OneTime,
    Recurring,
}

/// Billing frequency of a recurring price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingPlanInterval {
    Day,
    Week,
    Month,
    Year,
}
