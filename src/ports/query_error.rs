//! Errors from record queries.

use thiserror::Error;

/// Failure of a single-row record query.
///
/// The store treats every variant the same way (the field stays absent);
/// the distinction exists for logging and for callers using the readers
/// directly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// Request could not be sent or the response could not be read.
    #[error("Network error: {0}")]
    Network(String),

    /// Single-row query matched zero rows or more than one row.
    #[error("Expected exactly one row from '{relation}'")]
    NotSingleRow { relation: &'static str },

    /// Backend rejected the credentials.
    #[error("Not authorized to read '{relation}'")]
    Unauthorized { relation: &'static str },

    /// Any other non-success status.
    #[error("Backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected record shape.
    #[error("Failed to decode '{relation}' row: {message}")]
    Decode {
        relation: &'static str,
        message: String,
    },

    /// HTTP client could not be constructed.
    #[error("Client configuration error: {0}")]
    Client(String),
}

impl QueryError {
    /// Creates a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    /// Creates a decode error for a relation.
    pub fn decode(relation: &'static str, message: impl Into<String>) -> Self {
        Self::Decode {
            relation,
            message: message.into(),
        }
    }

    /// True when the query found no row for the user.
    pub fn is_not_found(&self) -> bool {
        matches!(self, QueryError::NotSingleRow { .. })
    }
}
