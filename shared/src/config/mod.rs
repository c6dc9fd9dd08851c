//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Environment detection and logging configuration
//! - `otp` - Verification code lifetime and issuance throttling
//! - `server` - HTTP server binding
//! - `sms` - Dispatch mode and SMS provider credentials

pub mod environment;
pub mod otp;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use otp::OtpConfig;
pub use server::ServerConfig;
pub use sms::{DispatchMode, SmsConfig, SmsSender};

/// Errors raised while reading configuration values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required setting: {key}")]
    Missing { key: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Verification code configuration
    pub otp: OtpConfig,

    /// Dispatch mode deciding which messages are really transmitted
    pub dispatch_mode: DispatchMode,

    /// SMS provider configuration
    pub sms: SmsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load `.env` if present, then read and validate the process environment
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// `from_env` delegates here; tests pass a closure over a map so they never
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("ENVIRONMENT")
            .and_then(|v| v.parse().ok())
            .unwrap_or_default();

        let dispatch_mode = match lookup("DISPATCH_MODE").or_else(|| lookup("SMS_MODE")) {
            Some(raw) => raw.parse()?,
            None => DispatchMode::default(),
        };

        Ok(Self {
            environment,
            server: ServerConfig::from_lookup(&lookup)?,
            otp: OtpConfig::from_lookup(&lookup)?,
            dispatch_mode,
            sms: SmsConfig::from_lookup(&lookup)?,
            logging: LoggingConfig::from_lookup(environment, &lookup),
        })
    }

    /// Check that the SMS settings are usable for the configured dispatch mode
    ///
    /// When any message may be really transmitted, provider credentials and a
    /// sender must be present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch_mode.may_send_any() {
            self.sms.require_credentials()?;
        }
        Ok(())
    }
}

/// Parse an optional numeric setting, falling back to `default` when unset
pub(crate) fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.dispatch_mode, DispatchMode::OtpOnly);
        assert_eq!(config.otp.ttl_minutes, 5);
        assert_eq!(config.server.port, 5000);
    }

    #[test]
    fn test_sms_mode_alias_is_honoured() {
        let config = AppConfig::from_lookup(lookup_from(&[("SMS_MODE", "none")])).unwrap();
        assert_eq!(config.dispatch_mode, DispatchMode::None);

        let config = AppConfig::from_lookup(lookup_from(&[
            ("SMS_MODE", "none"),
            ("DISPATCH_MODE", "all"),
        ]))
        .unwrap();
        assert_eq!(config.dispatch_mode, DispatchMode::All);
    }

    #[test]
    fn test_invalid_dispatch_mode_is_rejected() {
        let result = AppConfig::from_lookup(lookup_from(&[("DISPATCH_MODE", "sometimes")]));
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_validate_requires_credentials_only_when_sending() {
        let config = AppConfig::from_lookup(lookup_from(&[("DISPATCH_MODE", "none")])).unwrap();
        assert!(config.validate().is_ok());

        let config = AppConfig::from_lookup(lookup_from(&[("DISPATCH_MODE", "otp-only")])).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Missing { .. })));

        let config = AppConfig::from_lookup(lookup_from(&[
            ("DISPATCH_MODE", "all"),
            ("TWILIO_ACCOUNT_SID", "AC123"),
            ("TWILIO_AUTH_TOKEN", "secret"),
            ("TWILIO_SMS_FROM", "+15005550006"),
        ]))
        .unwrap();
        assert!(config.validate().is_ok());
    }
}
