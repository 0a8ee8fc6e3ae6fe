//! SHA-256 hashing utilities
//!
//! Checkpoint digests are hex-encoded SHA-256 over raw line content.

use sha2::{Digest, Sha256};

/// Compute the hex-encoded SHA-256 digest of a byte slice
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Digest of a single log line, as used for checkpoint matching
///
/// Hashes the raw line content with no trailing newline.
pub fn line_digest(line: &str) -> String {
    sha256_hex(line.as_bytes())
}
