//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types
pub use types::{DispatchError, OtpError, ThrottleRejection};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to the verification error taxonomy
    #[error(transparent)]
    Otp(#[from] OtpError),
}

impl From<DispatchError> for DomainError {
    fn from(err: DispatchError) -> Self {
        DomainError::Otp(OtpError::Dispatch(err))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
