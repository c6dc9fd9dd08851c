//! SMS provider and dispatch mode configuration

use serde::{Deserialize, Serialize};

use super::{parse_or, ConfigError};

/// Which outbound messages are really transmitted
///
/// - `all`: every message goes to the provider
/// - `otp-only`: verification codes are sent, other notifications are simulated
/// - `none`: everything is simulated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchMode {
    All,
    #[default]
    OtpOnly,
    None,
}

impl DispatchMode {
    /// Whether this mode ever needs a real provider
    pub fn may_send_any(&self) -> bool {
        !matches!(self, DispatchMode::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchMode::All => "all",
            DispatchMode::OtpOnly => "otp-only",
            DispatchMode::None => "none",
        }
    }
}

impl std::fmt::Display for DispatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DispatchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(DispatchMode::All),
            "otp-only" | "otp_only" | "otp" => Ok(DispatchMode::OtpOnly),
            "none" | "off" => Ok(DispatchMode::None),
            _ => Err(ConfigError::InvalidValue {
                key: "DISPATCH_MODE".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Sender identity used by the provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmsSender {
    /// Messaging service SID (`MG...`), preferred when present
    MessagingService(String),
    /// A provider phone number in E.164 format
    From(String),
}

/// SMS provider (Twilio) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Twilio Account SID
    pub account_sid: Option<String>,
    /// Twilio Auth Token
    #[serde(skip_serializing)]
    pub auth_token: Option<String>,
    /// Sender identity
    pub sender: Option<SmsSender>,
    /// Optional delivery status webhook
    pub status_callback: Option<String>,
    /// Provider API base URL
    pub api_base: String,
    /// Maximum send attempts for retryable failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds, doubled after each attempt
    pub retry_delay_ms: u64,
    /// Timeout for a single provider request
    pub request_timeout_secs: u64,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            sender: None,
            status_callback: None,
            api_base: String::from("https://api.twilio.com"),
            max_retries: 3,
            retry_delay_ms: 500,
            request_timeout_secs: 15,
        }
    }
}

impl SmsConfig {
    /// Read the `TWILIO_*` settings
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let sender = match (
            non_empty("TWILIO_MESSAGING_SERVICE_SID"),
            non_empty("TWILIO_SMS_FROM"),
        ) {
            (Some(sid), _) => Some(SmsSender::MessagingService(sid)),
            (None, Some(from)) => Some(SmsSender::From(from)),
            (None, None) => None,
        };

        Ok(Self {
            account_sid: non_empty("TWILIO_ACCOUNT_SID"),
            auth_token: non_empty("TWILIO_AUTH_TOKEN"),
            sender,
            status_callback: non_empty("TWILIO_STATUS_CALLBACK"),
            api_base: non_empty("TWILIO_API_BASE").unwrap_or(defaults.api_base),
            max_retries: parse_or(lookup, "TWILIO_MAX_RETRIES", defaults.max_retries)?,
            retry_delay_ms: parse_or(lookup, "TWILIO_RETRY_DELAY_MS", defaults.retry_delay_ms)?,
            request_timeout_secs: parse_or(
                lookup,
                "TWILIO_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
        })
    }

    /// Ensure credentials and a sender are present
    pub fn require_credentials(&self) -> Result<(), ConfigError> {
        if self.account_sid.is_none() {
            return Err(ConfigError::Missing {
                key: "TWILIO_ACCOUNT_SID".to_string(),
            });
        }
        if self.auth_token.is_none() {
            return Err(ConfigError::Missing {
                key: "TWILIO_AUTH_TOKEN".to_string(),
            });
        }
        if self.sender.is_none() {
            return Err(ConfigError::Missing {
                key: "TWILIO_MESSAGING_SERVICE_SID or TWILIO_SMS_FROM".to_string(),
            });
        }
        Ok(())
    }
}
