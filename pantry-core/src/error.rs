//! Error types for the pantry backend

use thiserror::Error;

/// Pantry-wide error type
#[derive(Error, Debug)]
pub enum PantryError {
    /// Malformed caller-supplied payload
    #[error("Parse error: {0}")]
    Parse(String),

    /// Canonical dictionary could not be read or decoded
    #[error("Dictionary error: {0}")]
    Dictionary(String),
}

impl PantryError {
    pub fn parse(msg: impl Into<String>) -> Self {
        PantryError::Parse(msg.into())
    }

    pub fn dictionary(msg: impl Into<String>) -> Self {
        PantryError::Dictionary(msg.into())
    }
}

/// Result type alias for pantry operations
pub type PantryResult<T> = Result<T, PantryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PantryError::parse("bad receipt").to_string(),
            "Parse error: bad receipt"
        );
        assert!(matches!(
            PantryError::dictionary("missing"),
            PantryError::Dictionary(ref m) if m == "missing"
        ));
    }
}
