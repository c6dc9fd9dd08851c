//! OTP service module for phone verification
//!
//! This module provides the complete challenge workflow:
//! - Code generation, hashing and storage
//! - Cooldown and per-window issuance limits
//! - Real or simulated SMS dispatch per operation
//! - Verification with existence, expiry and code checks
//! - Periodic sweep of stale challenges

mod clock;
mod config;
mod dispatch;
mod key_lock;
pub mod messages;
mod service;
mod throttle;
mod types;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::OtpServiceConfig;
pub use dispatch::{DispatchModePolicy, Dispatcher, SimulatedTransport, SmsTransport};
pub use key_lock::KeyLocks;
pub use service::OtpService;
pub use throttle::{Admission, ThrottlePolicy};
pub use types::{IssuedChallenge, SweepResult, VerificationOutcome};
