//! User domain module.
//!
//! Profile details of the authenticated user, as stored in the `users`
//! relation of the backend.

mod details;

pub use details::UserDetails;
