//! Password storage and challenge verification.
//!
//! Passwords are stored as `sha256_hex(plaintext + salt)` where the salt
//! is a single process-wide secret from configuration. Login presents
//! `sha256_hex(stored_hash + timestamp)` instead of the plaintext, which
//! binds each attempt to a timestamp; freshness of that timestamp is
//! enforced by the login-handling layer, not here.

use sha2::{Digest, Sha256};

/// Hash a plaintext password with the process-wide salt.
///
/// Called once at user creation and again on every password change. The
/// result is the only credential material ever persisted.
#[must_use]
pub fn hash_password(plain: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    hasher.update(salt.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Digest a stored hash together with a login timestamp.
///
/// Deterministic: the same hash and timestamp always produce the same
/// digest. Timestamps are unix seconds rendered in decimal.
#[must_use]
pub fn challenge_digest(stored_hash: &str, timestamp: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(stored_hash.as_bytes());
    hasher.update(timestamp.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a presented challenge digest against the stored hash.
#[must_use]
pub fn verify_challenge(stored_hash: &str, enc_password: &str, timestamp: i64) -> bool {
    challenge_digest(stored_hash, timestamp) == enc_password
}
