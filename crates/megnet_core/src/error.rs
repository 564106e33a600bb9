//! Error types for megnet_core.

use thiserror::Error;

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core errors that can occur in megnet operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Shape mismatch between tensors.
    #[error("Shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Dimension error.
    #[error("Dimension error: expected {expected} dimensions, got {got}")]
    DimensionError {
        /// Expected number of dimensions.
        expected: usize,
        /// Actual number of dimensions.
        got: usize,
    },

    /// Invalid model configuration.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// Generic error.
    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::DimensionError {
            expected: 3,
            got: 2,
        };
        assert_eq!(
            err.to_string(),
            "Dimension error: expected 3 dimensions, got 2"
        );

        let err = CoreError::ShapeMismatch("channels differ".into());
        assert_eq!(err.to_string(), "Shape mismatch: channels differ");
    }
}
