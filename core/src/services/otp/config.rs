//! Configuration for the OTP service

use chrono::Duration;

use cb_shared::config::OtpConfig;

use crate::domain::entities::challenge::DEFAULT_EXPIRATION_MINUTES;

/// Tunables of the issuance and verification engine
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Minutes a code stays valid
    pub ttl_minutes: u32,
    /// Minimum seconds between two issuances for one phone
    pub cooldown_seconds: u64,
    /// Length of the rate-limit window in seconds
    pub window_seconds: u64,
    /// Issuances allowed per window
    pub max_issuances_per_window: u32,
    /// Brand shown in outgoing messages
    pub brand: String,
    /// Seconds between passive sweeps, 0 disables the sweep task
    pub sweep_interval_seconds: u64,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_EXPIRATION_MINUTES,
            cooldown_seconds: 30,
            window_seconds: 3600,
            max_issuances_per_window: 5,
            brand: String::from("LEADER"),
            sweep_interval_seconds: 60,
        }
    }
}

impl OtpServiceConfig {
    pub fn ttl(&self) -> Duration {
        Duration::minutes(i64::from(self.ttl_minutes))
    }

    pub fn cooldown(&self) -> Duration {
        seconds(self.cooldown_seconds)
    }

    pub fn window(&self) -> Duration {
        seconds(self.window_seconds)
    }
}

impl From<&OtpConfig> for OtpServiceConfig {
    fn from(config: &OtpConfig) -> Self {
        Self {
            ttl_minutes: config.ttl_minutes,
            cooldown_seconds: config.cooldown_seconds,
            window_seconds: config.window_seconds,
            max_issuances_per_window: config.max_issuances_per_window,
            brand: config.brand.clone(),
            sweep_interval_seconds: config.sweep_interval_seconds,
        }
    }
}

fn seconds(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value).unwrap_or(i64::MAX).min(i64::MAX / 1000))
}
