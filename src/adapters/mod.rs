//! Adapters - Implementations of port interfaces.
//!
//! - `postgrest` - Record readers over the backend's PostgREST API (reqwest)
//! - `memory` - In-memory record store for tests and local development
//! - `session` - Session source backed by a `tokio::sync::watch` channel

pub mod memory;
pub mod postgrest;
pub mod session;
