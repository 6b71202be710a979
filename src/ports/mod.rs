//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the user context store and the outside world. Adapters implement these
//! ports.
//!
//! ## Session Port
//!
//! - `SessionSource` - Identity provider's session and its change notifications
//!
//! ## Record Ports
//!
//! - `UserDetailsReader` - Single-row profile query
//! - `SubscriptionReader` - Single-row current-subscription query
//! - `UserScope` - Identity and credentials a record query runs under

mod query_error;
mod session_source;
mod subscription_reader;
mod user_details_reader;
mod user_scope;

pub use query_error::QueryError;
pub use session_source::SessionSource;
pub use subscription_reader::SubscriptionReader;
pub use user_details_reader::UserDetailsReader;
pub use user_scope::UserScope;
