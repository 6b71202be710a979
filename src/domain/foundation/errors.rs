//! Construction errors of the foundation value types.

use thiserror::Error;

/// A value was rejected while building a domain type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Value was empty or only whitespace.
    #[error("{field} must not be blank")]
    Blank { field: &'static str },
}

impl ValidationError {
    pub fn blank(field: &'static str) -> Self {
        ValidationError::Blank { field }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_names_the_field() {
        assert_eq!(
            ValidationError::blank("access_token").to_string(),
            "access_token must not be blank"
        );
    }
}
