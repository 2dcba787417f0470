//! Error types for the data collaborators.

use surge_traits::SurgeError;
use thiserror::Error;

/// Errors that can occur while fetching the universe or prices.
#[derive(Debug, Error)]
pub enum DataError {
    /// Missing API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing failed.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// API returned an error.
    #[error("FMP API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Free tier allows 250 requests/day.")]
    RateLimitExceeded,

    /// Index name not in the catalogue.
    #[error("Unknown index: {0}")]
    UnknownIndex(String),

    /// Constituent file has no usable symbol column.
    #[error("No symbol column in constituent file")]
    NoSymbolColumn,

    /// No data available.
    #[error("No data available for {0}")]
    NoData(String),

    /// Environment variable error.
    #[error("Environment error: {0}")]
    Env(#[from] dotenvy::Error),
}

impl From<DataError> for SurgeError {
    fn from(err: DataError) -> Self {
        Self::DataFetch(err.to_string())
    }
}
