//! Verification code configuration module

use serde::{Deserialize, Serialize};

use super::{parse_or, ConfigError};

/// One day
const MAX_TTL_MINUTES: u64 = 24 * 60;
/// One day
const MAX_COOLDOWN_SECONDS: u64 = 24 * 60 * 60;
/// 365 days
const MAX_WINDOW_SECONDS: u64 = 365 * 24 * 60 * 60;

/// Lifetime and issuance limits for phone verification codes
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Minutes a code stays valid after issuance
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: u32,

    /// Minimum spacing between two issuances for the same phone
    #[serde(default = "default_cooldown_seconds")]
    pub cooldown_seconds: u64,

    /// Length of the rate-limit counting window
    #[serde(default = "default_window_seconds")]
    pub window_seconds: u64,

    /// Issuances allowed per phone inside one window
    #[serde(default = "default_max_issuances")]
    pub max_issuances_per_window: u32,

    /// Brand name shown in outgoing messages
    #[serde(default = "default_brand")]
    pub brand: String,

    /// Seconds between passive sweeps of stale challenges (0 disables)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: default_ttl_minutes(),
            cooldown_seconds: default_cooldown_seconds(),
            window_seconds: default_window_seconds(),
            max_issuances_per_window: default_max_issuances(),
            brand: default_brand(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl OtpConfig {
    /// Read the `OTP_*` settings, keeping defaults for anything unset
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            ttl_minutes: parse_or(lookup, "OTP_TTL_MINUTES", default_ttl_minutes())?,
            cooldown_seconds: parse_or(lookup, "OTP_COOLDOWN_SECONDS", default_cooldown_seconds())?,
            window_seconds: parse_or(lookup, "OTP_WINDOW_SECONDS", default_window_seconds())?,
            max_issuances_per_window: parse_or(lookup, "OTP_MAX_PER_WINDOW", default_max_issuances())?,
            brand: lookup("OTP_BRAND").unwrap_or_else(default_brand),
            sweep_interval_seconds: parse_or(
                lookup,
                "OTP_SWEEP_INTERVAL_SECONDS",
                default_sweep_interval(),
            )?,
        };

        check_range("OTP_TTL_MINUTES", u64::from(config.ttl_minutes), 1, MAX_TTL_MINUTES)?;
        check_range("OTP_COOLDOWN_SECONDS", config.cooldown_seconds, 0, MAX_COOLDOWN_SECONDS)?;
        check_range("OTP_WINDOW_SECONDS", config.window_seconds, 1, MAX_WINDOW_SECONDS)?;
        check_range(
            "OTP_MAX_PER_WINDOW",
            u64::from(config.max_issuances_per_window),
            1,
            u64::from(u32::MAX),
        )?;

        Ok(config)
    }

    /// Code lifetime in seconds
    pub fn ttl_seconds(&self) -> u64 {
        u64::from(self.ttl_minutes) * 60
    }
}

fn check_range(key: &str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

fn default_ttl_minutes() -> u32 {
    5
}

fn default_cooldown_seconds() -> u64 {
    30
}

fn default_window_seconds() -> u64 {
    3600 // 1 hour
}

fn default_max_issuances() -> u32 {
    5
}

fn default_brand() -> String {
    String::from("LEADER")
}

fn default_sweep_interval() -> u64 {
    60
}
