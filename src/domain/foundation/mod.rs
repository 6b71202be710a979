//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the user context domain.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AccessToken, SessionUser};
pub use errors::ValidationError;
pub use ids::UserId;
pub use timestamp::Timestamp;
