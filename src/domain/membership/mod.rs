//! Membership domain module.
//!
//! Subscription records mirrored from the billing provider, with their
//! nested price and product records.
//!
//! # Module Structure
//!
//! - `status` - SubscriptionStatus as reported by the billing provider
//! - `subscription` - Subscription, Price and Product records

mod status;
mod subscription;

pub use status::SubscriptionStatus;
pub use subscription::{Price, PricingPlanInterval, PricingType, Product, Subscription};
