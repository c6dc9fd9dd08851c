//! Types for OTP service results

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::value_objects::dispatch::DispatchReceipt;
use crate::domain::value_objects::phone_key::PhoneKey;

/// Result of a successful issuance
#[derive(Debug, Clone)]
pub struct IssuedChallenge {
    /// Canonical phone the code was issued for
    pub phone: PhoneKey,
    /// Transport acknowledgement
    pub receipt: DispatchReceipt,
    /// When the code stops being accepted
    pub expires_at: DateTime<Utc>,
    /// When the caller may request another code
    pub next_resend_at: DateTime<Utc>,
    /// Whole seconds until `next_resend_at`, rounded up like the throttle
    pub resend_after_seconds: u64,
}

impl IssuedChallenge {
    /// Whether the code really left as an SMS
    pub fn transmitted(&self) -> bool {
        !self.receipt.simulated
    }
}

/// Result of checking a submitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationOutcome {
    /// Code matched; the challenge is consumed
    Verified,
    /// Nothing was issued for this phone (or it was already consumed)
    NoChallenge,
    /// Code was past its expiry; the challenge is removed
    Expired,
    /// Wrong code; the challenge stays for another try
    Mismatch,
}

/// Summary of one sweep pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepResult {
    /// Challenge records removed
    pub records_removed: usize,
    /// Idle per-key lock entries released
    pub locks_released: usize,
}
