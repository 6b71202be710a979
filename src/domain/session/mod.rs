//! Session domain module.
//!
//! The externally managed authentication session that drives the store,
//! and the snapshot the store derives from it.

mod auth_session;
mod snapshot;

pub use auth_session::Session;
pub use snapshot::SessionSnapshot;
