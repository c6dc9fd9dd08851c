//! Pending verification challenge entity.

use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use cb_shared::utils::phone::latinize_digits;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default lifetime of a verification code (5 minutes)
pub const DEFAULT_EXPIRATION_MINUTES: u32 = 5;

/// The current challenge for one phone key
///
/// Only the SHA-256 digest of the code is kept; the plaintext exists only in
/// the outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRecord {
    /// Hex encoded SHA-256 of the code
    pub secret_hash: String,

    /// Instant after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Start of the current rate-limit counting window
    pub attempt_window_start: DateTime<Utc>,

    /// Issuances counted inside the current window
    pub attempt_count: u32,

    /// Instant of the most recent issuance
    pub last_issued_at: DateTime<Utc>,
}

impl ChallengeRecord {
    /// Check whether the code has passed its expiry instant
    ///
    /// A code is still valid at exactly `expires_at`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Compare a submitted code against the stored digest in constant time
    pub fn matches(&self, submitted: &str) -> bool {
        let candidate = hash_code(&canonical_code(submitted));
        constant_time_eq(candidate.as_bytes(), self.secret_hash.as_bytes())
    }
}

/// Generate a uniformly random 6-digit code using OS entropy
///
/// Leading zeros are kept, so every value in `000000..=999999` can occur.
pub fn generate_code() -> String {
    let value: u32 = OsRng.gen_range(0..1_000_000);
    format!("{:0width$}", value, width = CODE_LENGTH)
}

/// Hex encoded SHA-256 digest of a code
pub fn hash_code(code: &str) -> String {
    hex::encode(Sha256::digest(code.as_bytes()))
}

/// Latin digits, surrounding whitespace removed
pub fn canonical_code(submitted: &str) -> String {
    latinize_digits(submitted.trim())
}
