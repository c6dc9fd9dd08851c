//! Error types for challenge issuance and message dispatch
//!
//! Messages are kept in English here; the presentation layer decides what
//! the caller finally sees.

use thiserror::Error;

/// Errors raised by the OTP engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OtpError {
    #[error("Invalid phone format: {phone}")]
    InvalidPhoneFormat { phone: String },

    #[error("{0}")]
    Throttled(ThrottleRejection),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Why an issuance request was refused by the throttle
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleRejection {
    /// The previous code was sent less than a cooldown ago
    #[error("Please wait {retry_after_seconds}s before requesting another OTP.")]
    Cooldown { retry_after_seconds: u64 },

    /// Too many codes were issued in the current window
    #[error("Too many OTP requests. Please try again in {retry_after_seconds}s.")]
    WindowExceeded { retry_after_seconds: u64 },
}

impl ThrottleRejection {
    /// Seconds the caller should wait before trying again
    pub fn retry_after_seconds(&self) -> u64 {
        match self {
            ThrottleRejection::Cooldown { retry_after_seconds }
            | ThrottleRejection::WindowExceeded { retry_after_seconds } => *retry_after_seconds,
        }
    }
}

/// Transport failures, split by whether the caller can usefully retry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Credentials, sender or account setup are wrong
    #[error("SMS transport misconfigured: {message}")]
    Configuration { message: String },

    /// The provider refused this particular message
    #[error("SMS rejected by provider ({code}): {message}")]
    Rejected { code: String, message: String },

    /// Network failure, provider outage or provider-side rate limiting
    #[error("SMS provider unavailable: {message}")]
    Unavailable { message: String },
}

impl DispatchError {
    /// Whether sending the same message again later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, DispatchError::Unavailable { .. })
    }
}
