//! Domain layer containing the user context vocabulary.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, auth types, timestamps, errors)
//! - `session` - External session input and the derived snapshot
//! - `user` - Profile details of the authenticated user
//! - `membership` - Subscription, price and product records

pub mod foundation;
pub mod membership;
pub mod session;
pub mod user;
