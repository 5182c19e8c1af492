//! Error types for Cosmoport core.

use std::{error::Error, fmt};

/// Error type for ship registry operations.
#[derive(Debug, Clone, PartialEq)]
pub enum CosmoportError {
    /// A malformed id, an out-of-range or missing field, or invalid paging.
    InvalidInput,
    /// The requested ship id does not exist.
    NotFound(i64),
    /// The record store failed to complete the operation.
    Store(String),
}

impl fmt::Display for CosmoportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput => write!(f, "invalid input"),
            Self::NotFound(id) => write!(f, "ship {id} not found"),
            Self::Store(message) => write!(f, "store error: {message}"),
        }
    }
}

impl Error for CosmoportError {}

/// Convenience result type for Cosmoport core.
pub type Result<T> = std::result::Result<T, CosmoportError>;

#[cfg(test)]
mod tests {
    use super::CosmoportError;

    #[test]
    fn invalid_input_formats_uniform_message() {
        assert_eq!(CosmoportError::InvalidInput.to_string(), "invalid input");
    }

    #[test]
    fn not_found_formats_id() {
        assert_eq!(CosmoportError::NotFound(42).to_string(), "ship 42 not found");
    }

    #[test]
    fn store_error_formats_message() {
        let error = CosmoportError::Store("connection refused".to_string());
        assert_eq!(format!("{error}"), "store error: connection refused");
    }
}
