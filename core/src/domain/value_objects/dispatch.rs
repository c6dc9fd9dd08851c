//! Outbound message value objects

use serde::{Deserialize, Serialize};

use super::phone_key::PhoneKey;

/// Logical operation an outbound message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationTag {
    /// Verification code delivery
    SendOtp,
    /// Booking confirmation notice
    SendConfirmation,
}

impl OperationTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationTag::SendOtp => "send-otp",
            OperationTag::SendConfirmation => "send-confirmation",
        }
    }
}

impl std::fmt::Display for OperationTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message handed to the transport; never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchRequest {
    pub to: PhoneKey,
    pub body: String,
    pub tag: OperationTag,
}

impl DispatchRequest {
    pub fn new(to: PhoneKey, body: impl Into<String>, tag: OperationTag) -> Self {
        Self {
            to,
            body: body.into(),
            tag,
        }
    }
}

/// Status reported for a simulated send
pub const SIMULATED_STATUS: &str = "mocked";

/// Transport acknowledgement, identical in shape for real and simulated sends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReceipt {
    /// Provider message id (`SM...`) or a synthesized `mock_...` id
    pub id: String,
    /// Provider status (`queued`, `accepted`, ...) or `mocked`
    pub status: String,
    /// True when no message left the process
    pub simulated: bool,
}

impl DispatchReceipt {
    pub fn delivered(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: status.into(),
            simulated: false,
        }
    }

    pub fn simulated(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: SIMULATED_STATUS.to_string(),
            simulated: true,
        }
    }
}

/// Delivery state of a previously sent message, as reported by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageStatus {
    pub sid: String,
    pub to: Option<String>,
    pub from: Option<String>,
    pub status: String,
    pub error_code: Option<i64>,
    pub error_message: Option<String>,
    pub date_created: Option<String>,
    pub date_sent: Option<String>,
    pub date_updated: Option<String>,
}

/// Details of a confirmed booking, used to build the confirmation notice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub customer_name: Option<String>,
    pub barber_name: String,
    pub services: String,
    pub date: String,
    pub time: String,
}
