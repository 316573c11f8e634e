//! Error types for kolumn operations.

use thiserror::Error;

/// Result type alias using [`KolumnError`].
pub type Result<T> = std::result::Result<T, KolumnError>;

/// Error types for kolumn operations.
///
/// Only structural violations surface here. Malformed field values found
/// while parsing are absorbed as null cells and never reach this enum.
#[derive(Debug, Error)]
pub enum KolumnError {
    // ==================== Kernel Errors ====================
    /// Operand vectors have different lengths.
    #[error("Length mismatch: left operand has {left} elements, right operand has {right}")]
    LengthMismatch { left: usize, right: usize },

    /// Division by a zero literal.
    #[error("Division by zero")]
    DivisionByZero,

    // ==================== Construction Errors ====================
    /// Vector components violate a layout invariant.
    #[error("Invalid vector: {0}")]
    InvalidVector(String),

    // ==================== Configuration Errors ====================
    /// Validation error.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(String),

    // ==================== Collaborator Errors ====================
    /// CSV reader failure.
    #[error("CSV error: {0}")]
    Csv(String),

    /// Arrow conversion failure.
    #[error("Arrow error: {0}")]
    Arrow(String),

    /// I/O failure opening an input file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for KolumnError {
    fn from(err: csv::Error) -> Self {
        KolumnError::Csv(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for KolumnError {
    fn from(err: arrow::error::ArrowError) -> Self {
        KolumnError::Arrow(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_mismatch_display() {
        let err = KolumnError::LengthMismatch { left: 5, right: 3 };
        assert!(err.to_string().contains("5 elements"));
        assert!(err.to_string().contains("has 3"));
    }

    #[test]
    fn test_division_by_zero_display() {
        assert_eq!(KolumnError::DivisionByZero.to_string(), "Division by zero");
    }

    #[test]
    fn test_validation_error_display() {
        let err = KolumnError::ValidationError("num_workers must be at least 1".into());
        assert!(err.to_string().contains("Validation error"));
        assert!(err.to_string().contains("num_workers"));
    }
}
