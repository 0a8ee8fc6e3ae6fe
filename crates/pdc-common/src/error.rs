//! Error types shared across PDC crates

use thiserror::Error;

/// Result type alias for common PDC operations
pub type Result<T> = std::result::Result<T, PdcError>;

/// Base error type for the PDC workspace
#[derive(Error, Debug)]
pub enum PdcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),
}

impl PdcError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
