//! Content digests shared across Printloom crates

use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 digest of `bytes`.
///
/// Used to fingerprint exported artifacts in archive metadata.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
