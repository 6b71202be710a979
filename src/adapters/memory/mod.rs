//! In-memory adapters.
//!
//! Record readers that don't require a running backend. Used by tests and
//! by local development setups.

mod record_store;

pub use record_store::InMemoryRecordStore;
