//! # Infrastructure Layer
//!
//! Concrete implementations of the ports defined in `cb_core`.
//!
//! ## Architecture
//!
//! - **SMS**: Twilio Programmable Messaging over its REST API, and the
//!   factory that selects a transport from the dispatch mode

/// SMS service module - External SMS providers
pub mod sms;

pub use sms::{create_transport, TwilioConfig, TwilioTransport};

use cb_core::errors::DispatchError;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// SMS service error
    #[error("SMS service error: {0}")]
    Sms(String),
}

impl From<InfrastructureError> for DispatchError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => DispatchError::Configuration { message },
            InfrastructureError::Http(e) => DispatchError::Unavailable {
                message: e.to_string(),
            },
            InfrastructureError::Sms(message) => DispatchError::Rejected {
                code: "invalid_message".to_string(),
                message,
            },
        }
    }
}
