//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    Admission, Clock, DispatchModePolicy, Dispatcher, IssuedChallenge, KeyLocks, ManualClock,
    OtpService, OtpServiceConfig, SimulatedTransport, SmsTransport, SweepResult, SystemClock,
    ThrottlePolicy, VerificationOutcome,
};
