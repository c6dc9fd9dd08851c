use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use cb_core::domain::BookingConfirmation;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Local (`05XXXXXXXX`) or international (`+9725XXXXXXXX`) number,
    /// Arabic-Indic digits accepted
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "Phone is required"))]
    pub phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "Phone is required"))]
    pub phone: String,

    /// 6-digit code from the SMS
    #[serde(default)]
    #[validate(length(min = 1, max = 16, message = "Code is required"))]
    pub code: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendConfirmationRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 32, message = "Phone is required"))]
    pub phone: String,

    #[serde(default)]
    pub customer_name: Option<String>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Barber name is required"))]
    pub barber_name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Services are required"))]
    pub services: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Time is required"))]
    pub time: String,
}

impl SendConfirmationRequest {
    pub fn booking(&self) -> BookingConfirmation {
        BookingConfirmation {
            customer_name: self
                .customer_name
                .clone()
                .filter(|name| !name.trim().is_empty()),
            barber_name: self.barber_name.clone(),
            services: self.services.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
        }
    }
}

/// Response for endpoints that hand a message to the dispatcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchResponse {
    pub message: String,
    /// Provider message id, or `mock_...` when simulated
    pub sid: String,
    /// `queued`/`accepted` from the provider, `mocked` when simulated
    pub status: String,
    /// Seconds before another code may be requested (send-otp only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resend_after: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpResponse {
    pub message: String,
    pub verified: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub dispatch_mode: String,
    pub timestamp: DateTime<Utc>,
}
