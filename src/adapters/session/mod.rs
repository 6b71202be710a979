//! Session source adapters.

mod watch_source;

pub use watch_source::WatchSessionSource;
