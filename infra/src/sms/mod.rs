//! SMS Transport Module
//!
//! Real SMS delivery for the OTP engine. The simulated transport lives in
//! `cb_core`; this module only provides providers that leave the process.

use std::sync::Arc;

use cb_core::services::otp::SmsTransport;
use cb_shared::config::AppConfig;

use crate::InfrastructureError;

pub mod twilio;

pub use twilio::{TwilioConfig, TwilioTransport};

/// Create the real SMS transport required by the configured dispatch mode
///
/// Returns `Ok(None)` when the mode never transmits, so no credentials are
/// needed.
pub fn create_transport(
    config: &AppConfig,
) -> Result<Option<Arc<dyn SmsTransport>>, InfrastructureError> {
    if !config.dispatch_mode.may_send_any() {
        tracing::info!(
            dispatch_mode = %config.dispatch_mode,
            "SMS transport disabled, all messages will be simulated"
        );
        return Ok(None);
    }

    let twilio_config = TwilioConfig::from_settings(&config.sms, Some(config.otp.ttl_seconds()))?;
    let transport = TwilioTransport::new(twilio_config)?;
    Ok(Some(Arc::new(transport)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cb_shared::config::{DispatchMode, SmsSender};

    fn app_config(mode: DispatchMode) -> AppConfig {
        let mut config = AppConfig::from_lookup(|_| None).unwrap();
        config.dispatch_mode = mode;
        config
    }

    #[test]
    fn test_none_mode_needs_no_transport() {
        assert!(create_transport(&app_config(DispatchMode::None)).unwrap().is_none());
    }

    #[test]
    fn test_sending_mode_without_credentials_fails() {
        let result = create_transport(&app_config(DispatchMode::OtpOnly));
        assert!(matches!(result, Err(InfrastructureError::Config(_))));
    }

    #[test]
    fn test_sending_mode_builds_twilio() {
        let mut config = app_config(DispatchMode::All);
        config.sms.account_sid = Some("AC1".to_string());
        config.sms.auth_token = Some("token".to_string());
        config.sms.sender = Some(SmsSender::MessagingService("MG1".to_string()));

        let transport = create_transport(&config).unwrap().unwrap();
        assert_eq!(transport.name(), "twilio");
    }
}
