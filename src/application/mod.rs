//! Application layer - the user session store and its context distribution.
//!
//! `UserSessionStore` follows the identity provider's session and keeps the
//! signed-in user's profile and subscription in sync with it. The context
//! module exposes the store's snapshots to code running inside a provider
//! scope.

mod context;
mod store;

pub use context::{use_user, use_user_context, ContextError, UserContext, UserContextProvider};
pub use store::UserSessionStore;
