//! Error types for the Surge framework.
//!
//! Numeric edge cases (short histories, zero variance, degenerate
//! cross-sections) never surface here: they degrade to missing values inside
//! the computation. The variants below cover programmer errors caught at
//! construction time and failures of the data collaborators.

use thiserror::Error;

/// The main error type for Surge operations.
#[derive(Debug, Error)]
pub enum SurgeError {
    /// Momentum parameters failed validation.
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Error due to invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Two inputs that must share a shape did not.
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Description of the expected shape.
        expected: String,
        /// Description of the shape that was supplied.
        actual: String,
    },

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Error fetching data from external sources.
    #[error("Data fetch error: {0}")]
    DataFetch(String),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for SurgeError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for SurgeError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for Surge operations.
pub type Result<T> = std::result::Result<T, SurgeError>;
