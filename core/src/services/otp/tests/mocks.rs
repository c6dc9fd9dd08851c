//! Mock implementations for testing the OTP service

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::sync::{Arc, Mutex};

use cb_shared::config::DispatchMode;

use crate::domain::entities::challenge::CODE_LENGTH;
use crate::domain::value_objects::dispatch::{DispatchReceipt, DispatchRequest, MessageStatus};
use crate::errors::DispatchError;
use crate::repositories::InMemoryChallengeStore;
use crate::services::otp::{
    Dispatcher, ManualClock, OtpService, OtpServiceConfig, SmsTransport,
};

// Transport that records every request and can be switched to fail
pub struct RecordingTransport {
    pub sent: Mutex<Vec<DispatchRequest>>,
    pub failure: Mutex<Option<DispatchError>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    pub fn failing(error: DispatchError) -> Self {
        let transport = Self::new();
        transport.set_failure(Some(error));
        transport
    }

    pub fn set_failure(&self, error: Option<DispatchError>) {
        *self.failure.lock().unwrap() = error;
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<DispatchRequest> {
        self.sent.lock().unwrap().last().cloned()
    }

    pub fn last_code(&self) -> Option<String> {
        self.last_request().map(|request| extract_code(&request.body))
    }
}

#[async_trait]
impl SmsTransport for RecordingTransport {
    async fn send(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        let mut sent = self.sent.lock().unwrap();
        sent.push(request.clone());
        Ok(DispatchReceipt::delivered(format!("SM{:032}", sent.len()), "queued"))
    }

    async fn message_status(&self, sid: &str) -> Result<MessageStatus, DispatchError> {
        Ok(MessageStatus {
            sid: sid.to_string(),
            to: Some("+972501234567".to_string()),
            from: Some("+15005550006".to_string()),
            status: "delivered".to_string(),
            error_code: None,
            error_message: None,
            date_created: None,
            date_sent: None,
            date_updated: None,
        })
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Pull the 6-digit code out of an OTP message body
pub fn extract_code(body: &str) -> String {
    body.split(": ")
        .nth(1)
        .map(|rest| rest.chars().take(CODE_LENGTH).collect())
        .unwrap_or_default()
}

pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

pub struct Harness {
    pub service: Arc<OtpService<InMemoryChallengeStore>>,
    pub store: Arc<InMemoryChallengeStore>,
    pub transport: Arc<RecordingTransport>,
    pub clock: Arc<ManualClock>,
}

pub fn harness(mode: DispatchMode) -> Harness {
    harness_with(mode, RecordingTransport::new(), OtpServiceConfig::default())
}

pub fn harness_with(
    mode: DispatchMode,
    transport: RecordingTransport,
    config: OtpServiceConfig,
) -> Harness {
    let store = Arc::new(InMemoryChallengeStore::new());
    let transport = Arc::new(transport);
    let clock = Arc::new(ManualClock::new(start_time()));
    let dispatcher = Dispatcher::new(mode, Some(transport.clone() as Arc<dyn SmsTransport>));
    let service = Arc::new(OtpService::with_clock(
        store.clone(),
        dispatcher,
        config,
        clock.clone(),
    ));
    Harness {
        service,
        store,
        transport,
        clock,
    }
}
