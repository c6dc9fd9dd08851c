//! Shared utilities and common types for the Chairbook server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Error response structures
//! - Utility functions (phone masking, digit translation)
//! - Language preference for localized messages

pub mod config;
pub mod errors;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, ConfigError, DispatchMode, Environment, LogFormat, LoggingConfig, OtpConfig,
    ServerConfig, SmsConfig, SmsSender,
};
pub use errors::{error_codes, ErrorResponse};
pub use types::Language;
pub use utils::phone;
