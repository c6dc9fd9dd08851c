//! Dispatch mode policy and transport strategy

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use cb_shared::config::DispatchMode;

use crate::domain::value_objects::dispatch::{
    DispatchReceipt, DispatchRequest, MessageStatus, OperationTag,
};
use crate::errors::DispatchError;

/// Trait for SMS transport integration
#[async_trait]
pub trait SmsTransport: Send + Sync {
    /// Transmit one message
    async fn send(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError>;

    /// Look up the delivery status of a sent message
    async fn message_status(&self, sid: &str) -> Result<MessageStatus, DispatchError>;

    /// Short provider name for logs
    fn name(&self) -> &'static str;
}

/// Decides per operation whether a message is really transmitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchModePolicy {
    mode: DispatchMode,
}

impl DispatchModePolicy {
    pub fn new(mode: DispatchMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn should_dispatch(&self, tag: OperationTag) -> bool {
        match self.mode {
            DispatchMode::All => true,
            DispatchMode::None => false,
            DispatchMode::OtpOnly => tag == OperationTag::SendOtp,
        }
    }
}

/// Transport that never leaves the process
#[derive(Debug, Default, Clone, Copy)]
pub struct SimulatedTransport;

#[async_trait]
impl SmsTransport for SimulatedTransport {
    async fn send(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        tracing::debug!(
            phone = %request.to.masked(),
            operation = %request.tag,
            event = "sms_simulated",
            "SMS dispatch simulated"
        );
        Ok(DispatchReceipt::simulated(format!(
            "mock_{}_{}",
            request.tag,
            Uuid::new_v4().simple()
        )))
    }

    async fn message_status(&self, _sid: &str) -> Result<MessageStatus, DispatchError> {
        Err(DispatchError::Configuration {
            message: "simulated messages have no delivery status".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

/// Routes each message to the real or the simulated transport
///
/// The real transport is chosen once at construction; the policy then picks
/// per operation.
#[derive(Clone)]
pub struct Dispatcher {
    policy: DispatchModePolicy,
    real: Option<Arc<dyn SmsTransport>>,
    simulated: SimulatedTransport,
}

impl Dispatcher {
    pub fn new(mode: DispatchMode, real: Option<Arc<dyn SmsTransport>>) -> Self {
        Self {
            policy: DispatchModePolicy::new(mode),
            real,
            simulated: SimulatedTransport,
        }
    }

    /// Dispatcher that simulates every operation
    pub fn simulated() -> Self {
        Self::new(DispatchMode::None, None)
    }

    pub fn mode(&self) -> DispatchMode {
        self.policy.mode()
    }

    pub fn will_transmit(&self, tag: OperationTag) -> bool {
        self.policy.should_dispatch(tag)
    }

    pub async fn dispatch(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
        if !self.policy.should_dispatch(request.tag) {
            return self.simulated.send(request).await;
        }
        match &self.real {
            Some(transport) => transport.send(request).await,
            None => Err(DispatchError::Configuration {
                message: format!(
                    "dispatch mode '{}' requires an SMS transport for {}",
                    self.policy.mode(),
                    request.tag
                ),
            }),
        }
    }

    /// Delivery status from the real transport, `None` when there is none
    pub async fn message_status(&self, sid: &str) -> Option<Result<MessageStatus, DispatchError>> {
        match &self.real {
            Some(transport) => Some(transport.message_status(sid).await),
            None => None,
        }
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("mode", &self.policy.mode())
            .field("real", &self.real.as_ref().map(|t| t.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_matrix() {
        let all = DispatchModePolicy::new(DispatchMode::All);
        let otp_only = DispatchModePolicy::new(DispatchMode::OtpOnly);
        let none = DispatchModePolicy::new(DispatchMode::None);

        assert!(all.should_dispatch(OperationTag::SendOtp));
        assert!(all.should_dispatch(OperationTag::SendConfirmation));
        assert!(otp_only.should_dispatch(OperationTag::SendOtp));
        assert!(!otp_only.should_dispatch(OperationTag::SendConfirmation));
        assert!(!none.should_dispatch(OperationTag::SendOtp));
        assert!(!none.should_dispatch(OperationTag::SendConfirmation));
    }

    #[tokio::test]
    async fn test_simulated_receipt_shape() {
        let request = DispatchRequest::new(
            crate::domain::PhoneKey::normalize("0501234567").unwrap(),
            "hello",
            OperationTag::SendConfirmation,
        );
        let receipt = Dispatcher::simulated().dispatch(&request).await.unwrap();

        assert!(receipt.simulated);
        assert_eq!(receipt.status, "mocked");
        assert!(receipt.id.starts_with("mock_send-confirmation_"));
    }

    #[tokio::test]
    async fn test_missing_real_transport_is_a_configuration_error() {
        let dispatcher = Dispatcher::new(DispatchMode::All, None);
        let request = DispatchRequest::new(
            crate::domain::PhoneKey::normalize("0501234567").unwrap(),
            "hello",
            OperationTag::SendOtp,
        );
        let err = dispatcher.dispatch(&request).await.unwrap_err();
        assert!(matches!(err, DispatchError::Configuration { .. }));
        assert!(dispatcher.message_status("SM1").await.is_none());
    }
}
