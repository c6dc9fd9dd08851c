//! Issuance admission policy

use chrono::{DateTime, Duration, Utc};

use crate::domain::entities::challenge::ChallengeRecord;
use crate::errors::ThrottleRejection;

use super::config::OtpServiceConfig;

/// Outcome of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Issuance may go ahead; the new record continues this window
    Allow {
        /// Window start to store on the new record
        window_start: DateTime<Utc>,
        /// Issuances already counted in that window, excluding this one
        attempt_count: u32,
    },
    Reject(ThrottleRejection),
}

/// Cooldown plus fixed-window counter, evaluated per phone key
///
/// The policy only reads the previous record; the issuer writes the new one.
#[derive(Debug, Clone)]
pub struct ThrottlePolicy {
    cooldown: Duration,
    window: Duration,
    max_per_window: u32,
}

impl ThrottlePolicy {
    pub fn new(cooldown: Duration, window: Duration, max_per_window: u32) -> Self {
        Self {
            cooldown,
            window,
            max_per_window,
        }
    }

    /// Decide whether a new challenge may be issued at `now`
    ///
    /// Checks run in order: cooldown, window rollover, window budget.
    pub fn admit(&self, previous: Option<&ChallengeRecord>, now: DateTime<Utc>) -> Admission {
        let Some(record) = previous else {
            return Admission::Allow {
                window_start: now,
                attempt_count: 0,
            };
        };

        let since_last = non_negative(now - record.last_issued_at);
        if since_last < self.cooldown {
            return Admission::Reject(ThrottleRejection::Cooldown {
                retry_after_seconds: ceil_seconds(self.cooldown - since_last),
            });
        }

        let window_age = non_negative(now - record.attempt_window_start);
        if window_age >= self.window {
            return Admission::Allow {
                window_start: now,
                attempt_count: 0,
            };
        }

        if record.attempt_count >= self.max_per_window {
            return Admission::Reject(ThrottleRejection::WindowExceeded {
                retry_after_seconds: ceil_seconds(self.window - window_age),
            });
        }

        Admission::Allow {
            window_start: record.attempt_window_start,
            attempt_count: record.attempt_count,
        }
    }

    /// Whether a record can no longer influence any future admission
    pub fn is_settled(&self, record: &ChallengeRecord, now: DateTime<Utc>) -> bool {
        now - record.last_issued_at >= self.cooldown
            && now - record.attempt_window_start >= self.window
    }
}

impl From<&OtpServiceConfig> for ThrottlePolicy {
    fn from(config: &OtpServiceConfig) -> Self {
        Self::new(
            config.cooldown(),
            config.window(),
            config.max_issuances_per_window,
        )
    }
}

fn non_negative(duration: Duration) -> Duration {
    duration.max(Duration::zero())
}

/// Round a positive duration up to whole seconds, never below one
fn ceil_seconds(duration: Duration) -> u64 {
    let millis = duration.num_milliseconds().max(0) as u64;
    millis.div_ceil(1000).max(1)
}
