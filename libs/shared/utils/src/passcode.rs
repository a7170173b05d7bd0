use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};
use tracing::debug;

/// Digest stored in `ADMIN_PASSCODE_HASH`: base64 of SHA-256 over the passcode.
pub fn hash_passcode(passcode: &str) -> String {
    STANDARD.encode(Sha256::digest(passcode.as_bytes()))
}

pub fn verify_passcode(presented: &str, expected_hash: &str) -> bool {
    if expected_hash.is_empty() {
        debug!("Admin passcode hash is not configured");
        return false;
    }

    let expected = match STANDARD.decode(expected_hash.trim()) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("Failed to decode admin passcode hash: {}", e);
            return false;
        }
    };

    let actual = Sha256::digest(presented.as_bytes());
    constant_time_eq(actual.as_slice(), &expected)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
