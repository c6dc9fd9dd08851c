//! Twilio SMS Transport Implementation
//!
//! Sends messages through the Twilio Programmable Messaging REST API.
//!
//! ## Features
//!
//! - Messaging service or sender number, with optional status callback
//! - Validity period matching the code lifetime
//! - Retry with exponential backoff on connection failures, 429 and 5xx responses
//! - Failures split into configuration, rejection and availability errors
//! - Phone number masking in logs

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use cb_core::domain::{DispatchReceipt, DispatchRequest, MessageStatus};
use cb_core::errors::DispatchError;
use cb_core::services::otp::SmsTransport;
use cb_shared::config::{SmsConfig, SmsSender};

use crate::InfrastructureError;

/// Maximum body length accepted by Twilio
pub const MAX_BODY_CHARS: usize = 1600;

/// Twilio transport configuration
#[derive(Debug, Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// Messaging service or sender number
    pub sender: SmsSender,
    /// Delivery status webhook
    pub status_callback: Option<String>,
    /// API base URL, without trailing slash
    pub api_base: String,
    /// Seconds Twilio may keep trying to deliver a queued message
    pub validity_period_secs: Option<u64>,
    /// Maximum attempts for retryable failures
    pub max_retries: u32,
    /// Initial retry delay in milliseconds
    pub retry_delay_ms: u64,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl TwilioConfig {
    /// Build from the shared SMS settings
    ///
    /// `validity_period_secs` is normally the code lifetime.
    pub fn from_settings(
        sms: &SmsConfig,
        validity_period_secs: Option<u64>,
    ) -> Result<Self, InfrastructureError> {
        let account_sid = sms
            .account_sid
            .clone()
            .ok_or_else(|| InfrastructureError::Config("TWILIO_ACCOUNT_SID not set".to_string()))?;
        let auth_token = sms
            .auth_token
            .clone()
            .ok_or_else(|| InfrastructureError::Config("TWILIO_AUTH_TOKEN not set".to_string()))?;
        let sender = sms.sender.clone().ok_or_else(|| {
            InfrastructureError::Config(
                "TWILIO_MESSAGING_SERVICE_SID or TWILIO_SMS_FROM not set".to_string(),
            )
        })?;

        if let SmsSender::From(number) = &sender {
            if !number.starts_with('+') {
                return Err(InfrastructureError::Config(
                    "TWILIO_SMS_FROM must be in E.164 format (starting with '+')".to_string(),
                ));
            }
        }

        Ok(Self {
            account_sid,
            auth_token,
            sender,
            status_callback: sms.status_callback.clone(),
            api_base: sms.api_base.trim_end_matches('/').to_string(),
            validity_period_secs,
            max_retries: sms.max_retries.max(1),
            retry_delay_ms: sms.retry_delay_ms,
            request_timeout_secs: sms.request_timeout_secs,
        })
    }
}

/// Message resource returned by Twilio
#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
    status: String,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    date_created: Option<String>,
    #[serde(default)]
    date_sent: Option<String>,
    #[serde(default)]
    date_updated: Option<String>,
}

/// Error body returned by Twilio
#[derive(Debug, Default, Deserialize)]
struct TwilioErrorBody {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    more_info: Option<String>,
}

/// Failed send attempt, tagged with whether another attempt is safe
enum Attempt {
    Retry(DispatchError),
    Fail(DispatchError),
}

/// Twilio SMS transport
pub struct TwilioTransport {
    client: Client,
    config: TwilioConfig,
}

impl TwilioTransport {
    /// Create a new Twilio transport
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            sender = sender_label(&config.sender),
            "Twilio SMS transport initialized"
        );

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base, self.config.account_sid
        )
    }

    fn message_url(&self, sid: &str) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages/{}.json",
            self.config.api_base, self.config.account_sid, sid
        )
    }

    /// Form fields for the create-message call
    fn form_params(&self, request: &DispatchRequest) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("To", request.to.as_str().to_string()),
            ("Body", request.body.clone()),
        ];
        match &self.config.sender {
            SmsSender::MessagingService(sid) => params.push(("MessagingServiceSid", sid.clone())),
            SmsSender::From(number) => params.push(("From", number.clone())),
        }
        if let Some(callback) = &self.config.status_callback {
            params.push(("StatusCallback", callback.clone()));
        }
        if let Some(validity) = self.config.validity_period_secs {
            params.push(("ValidityPeriod", validity.to_string()));
        }
        params
    }

    /// One create-message call
    ///
    /// Only failures that prove Twilio did not accept the message are marked
    /// for retry: connection errors, 429 and 5xx. A timeout or an unreadable
    /// 2xx body may mean the SMS already went out.
    async fn send_once(
        &self,
        params: &[(&'static str, String)],
    ) -> Result<TwilioMessage, Attempt> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    Attempt::Retry(unavailable(e))
                } else {
                    Attempt::Fail(unavailable(e))
                }
            })?;

        let status = response.status();
        let retry = status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
        read_message(response).await.map_err(|e| {
            if retry {
                Attempt::Retry(e)
            } else {
                Attempt::Fail(e)
            }
        })
    }

    /// Send with retry logic
    async fn send_with_retry(&self, request: &DispatchRequest) -> Result<TwilioMessage, DispatchError> {
        let params = self.form_params(request);
        let mut attempts = 0;
        let mut delay = Duration::from_millis(self.config.retry_delay_ms);

        loop {
            attempts += 1;

            debug!(
                "Sending SMS attempt {}/{} to {}",
                attempts,
                self.config.max_retries,
                request.to.masked()
            );

            match self.send_once(&params).await {
                Ok(message) => return Ok(message),
                Err(Attempt::Retry(e)) if attempts < self.config.max_retries => {
                    warn!(
                        phone = %request.to.masked(),
                        attempt = attempts,
                        error = %e,
                        "Twilio send failed, retrying after {:?}",
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    delay *= 2; // Exponential backoff
                }
                Err(Attempt::Retry(e) | Attempt::Fail(e)) => {
                    error!(
                        phone = %request.to.masked(),
                        attempts = attempts,
                        error = %e,
                        "Failed to send SMS via Twilio"
                    );
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl SmsTransport for TwilioTransport {
    async fn send(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        if request.body.chars().count() > MAX_BODY_CHARS {
            return Err(InfrastructureError::Sms(format!(
                "Message exceeds maximum length of {} characters",
                MAX_BODY_CHARS
            ))
            .into());
        }

        let message = self.send_with_retry(request).await?;

        info!(
            phone = %request.to.masked(),
            sid = %message.sid,
            status = %message.status,
            operation = %request.tag,
            event = "sms_sent",
            "SMS accepted by Twilio"
        );
        Ok(DispatchReceipt::delivered(message.sid, message.status))
    }

    async fn message_status(&self, sid: &str) -> Result<MessageStatus, DispatchError> {
        if sid.is_empty() || !sid.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(DispatchError::Rejected {
                code: "invalid_sid".to_string(),
                message: "Message SID must be alphanumeric".to_string(),
            });
        }

        let response = self
            .client
            .get(self.message_url(sid))
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .send()
            .await
            .map_err(unavailable)?;

        let message = read_message(response).await?;
        Ok(MessageStatus {
            sid: message.sid,
            to: message.to,
            from: message.from,
            status: message.status,
            error_code: message.error_code,
            error_message: message.error_message,
            date_created: message.date_created,
            date_sent: message.date_sent,
            date_updated: message.date_updated,
        })
    }

    fn name(&self) -> &'static str {
        "twilio"
    }
}

async fn read_message(response: reqwest::Response) -> Result<TwilioMessage, DispatchError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<TwilioMessage>()
            .await
            .map_err(|e| DispatchError::Unavailable {
                message: format!("Unreadable Twilio response: {}", e),
            });
    }

    let body = response.text().await.unwrap_or_default();
    Err(classify_failure(status, &body))
}

/// Map a non-2xx Twilio response onto the dispatch error taxonomy
fn classify_failure(status: StatusCode, body: &str) -> DispatchError {
    let parsed: TwilioErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed
        .code
        .map(|c| c.to_string())
        .unwrap_or_else(|| status.as_u16().to_string());
    let mut message = parsed
        .message
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
    if let Some(more_info) = parsed.more_info {
        message = format!("{} ({})", message, more_info);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DispatchError::Configuration {
            message: format!("Twilio rejected credentials [{}]: {}", code, message),
        },
        StatusCode::TOO_MANY_REQUESTS => DispatchError::Unavailable {
            message: format!("Twilio rate limit [{}]: {}", code, message),
        },
        s if s.is_server_error() => DispatchError::Unavailable {
            message: format!("Twilio server error {} [{}]: {}", s.as_u16(), code, message),
        },
        _ => DispatchError::Rejected { code, message },
    }
}

fn unavailable(e: reqwest::Error) -> DispatchError {
    DispatchError::Unavailable {
        message: e.to_string(),
    }
}

fn sender_label(sender: &SmsSender) -> &'static str {
    match sender {
        SmsSender::MessagingService(_) => "messaging_service",
        SmsSender::From(_) => "from_number",
    }
}
