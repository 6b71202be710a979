//! User Context - Session-scoped user state for client applications
//!
//! This crate derives and caches the profile details and active subscription
//! of the currently authenticated user, and distributes a read-only snapshot
//! of that state to any code running inside a provider scope.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
