//! Application state shared by all handlers

use std::sync::Arc;

use cb_core::repositories::ChallengeStore;
use cb_core::services::otp::OtpService;

/// Services available to request handlers
pub struct AppState<S: ChallengeStore> {
    pub otp_service: Arc<OtpService<S>>,
}

impl<S: ChallengeStore> AppState<S> {
    pub fn new(otp_service: Arc<OtpService<S>>) -> Self {
        Self { otp_service }
    }
}
