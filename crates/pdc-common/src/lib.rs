//! PDC Common Library
//!
//! Shared utilities for the PDC workspace: error handling, logging
//! initialization, and the SHA-256 hashing used for checkpoint digests.

pub mod error;
pub mod hash;
pub mod logging;

// Re-export commonly used types
pub use error::{PdcError, Result};
