//! Unit tests for domain error types

use crate::errors::{DispatchError, DomainError, OtpError, ThrottleRejection};

#[test]
fn test_cooldown_message_carries_wait_hint() {
    let error = OtpError::Throttled(ThrottleRejection::Cooldown {
        retry_after_seconds: 12,
    });
    assert_eq!(error.to_string(), "Please wait 12s before requesting another OTP.");
}

#[test]
fn test_retry_after_for_both_rejections() {
    let cooldown = ThrottleRejection::Cooldown {
        retry_after_seconds: 3,
    };
    let window = ThrottleRejection::WindowExceeded {
        retry_after_seconds: 1800,
    };
    assert_eq!(cooldown.retry_after_seconds(), 3);
    assert_eq!(window.retry_after_seconds(), 1800);
    assert_eq!(
        window.to_string(),
        "Too many OTP requests. Please try again in 1800s."
    );
}

#[test]
fn test_only_unavailable_is_retryable() {
    assert!(DispatchError::Unavailable {
        message: "timeout".to_string()
    }
    .is_retryable());
    assert!(!DispatchError::Configuration {
        message: "bad token".to_string()
    }
    .is_retryable());
    assert!(!DispatchError::Rejected {
        code: "21211".to_string(),
        message: "invalid 'To' number".to_string()
    }
    .is_retryable());
}

#[test]
fn test_dispatch_error_converts_into_domain_error() {
    let error: DomainError = DispatchError::Unavailable {
        message: "503".to_string(),
    }
    .into();
    assert!(matches!(
        error,
        DomainError::Otp(OtpError::Dispatch(DispatchError::Unavailable { .. }))
    ));
}

#[test]
fn test_invalid_phone_is_transparent_through_domain_error() {
    let error: DomainError = OtpError::InvalidPhoneFormat {
        phone: "12".to_string(),
    }
    .into();
    assert_eq!(error.to_string(), "Invalid phone format: 12");
}
