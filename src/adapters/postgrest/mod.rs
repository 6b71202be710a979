//! PostgREST adapter.
//!
//! Implements `UserDetailsReader` and `SubscriptionReader` against the
//! backend's `/rest/v1` API using single-row (`vnd.pgrst.object`) requests.

mod client;
mod config;

pub use client::PostgrestClient;
pub use config::PostgrestConfig;
