//! Error types for the collector
//!
//! One taxonomy for both sources. Whether a failure is fatal for the run
//! is decided at the call site: list-page, audit-log, secret-store, and
//! sink failures abort; per-assessment export failures are logged and
//! skipped.

use thiserror::Error;

/// Result type alias for collector operations
pub type Result<T> = std::result::Result<T, CollectorError>;

/// Error type for collector operations
#[derive(Error, Debug)]
pub enum CollectorError {
    /// Upstream API returned a non-success status
    #[error("Upstream API error: {0}")]
    Api(String),

    /// HTTP transport failed
    #[error("Network request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// File system operation failed
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization or parsing failed
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Base URL could not be parsed
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration is missing or invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Secret store read or write failed
    #[error("Secret store error: {0}")]
    Secret(String),

    /// Shared workspace error
    #[error(transparent)]
    Common(#[from] pdc_common::PdcError),
}

impl CollectorError {
    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a secret store error
    pub fn secret(msg: impl Into<String>) -> Self {
        Self::Secret(msg.into())
    }
}
