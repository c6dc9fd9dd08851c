//! Unit tests for the issuance throttle

use chrono::{DateTime, Duration, Utc};

use super::mocks::start_time;
use crate::domain::entities::challenge::ChallengeRecord;
use crate::errors::ThrottleRejection;
use crate::services::otp::{Admission, OtpServiceConfig, ThrottlePolicy};

fn policy() -> ThrottlePolicy {
    ThrottlePolicy::from(&OtpServiceConfig::default())
}

fn record(window_start: DateTime<Utc>, last_issued_at: DateTime<Utc>, count: u32) -> ChallengeRecord {
    ChallengeRecord {
        secret_hash: "hash".to_string(),
        expires_at: last_issued_at + Duration::minutes(5),
        attempt_window_start: window_start,
        attempt_count: count,
        last_issued_at,
    }
}

#[test]
fn test_first_request_opens_a_window() {
    let now = start_time();
    assert_eq!(
        policy().admit(None, now),
        Admission::Allow {
            window_start: now,
            attempt_count: 0
        }
    );
}

#[test]
fn test_cooldown_rounds_wait_up() {
    let t0 = start_time();
    let previous = record(t0, t0, 1);

    let cases = [
        (Duration::zero(), 30),
        (Duration::seconds(10), 20),
        (Duration::milliseconds(29_500), 1),
        (Duration::milliseconds(10_001), 20),
    ];
    for (elapsed, expected) in cases {
        assert_eq!(
            policy().admit(Some(&previous), t0 + elapsed),
            Admission::Reject(ThrottleRejection::Cooldown {
                retry_after_seconds: expected
            }),
            "elapsed {:?}",
            elapsed
        );
    }
}

#[test]
fn test_cooldown_ends_exactly_at_thirty_seconds() {
    let t0 = start_time();
    let previous = record(t0, t0, 1);
    assert_eq!(
        policy().admit(Some(&previous), t0 + Duration::seconds(30)),
        Admission::Allow {
            window_start: t0,
            attempt_count: 1
        }
    );
}

#[test]
fn test_clock_skew_never_exceeds_cooldown() {
    let t0 = start_time();
    let previous = record(t0, t0 + Duration::seconds(90), 1);
    assert_eq!(
        policy().admit(Some(&previous), t0),
        Admission::Reject(ThrottleRejection::Cooldown {
            retry_after_seconds: 30
        })
    );
}

#[test]
fn test_window_budget_exhausted() {
    let t0 = start_time();
    let previous = record(t0, t0 + Duration::seconds(120), 5);
    let now = t0 + Duration::seconds(150);

    assert_eq!(
        policy().admit(Some(&previous), now),
        Admission::Reject(ThrottleRejection::WindowExceeded {
            retry_after_seconds: 3450
        })
    );
}

#[test]
fn test_window_rollover_resets_counter() {
    let t0 = start_time();
    let previous = record(t0, t0 + Duration::seconds(120), 5);
    let now = t0 + Duration::hours(1);

    assert_eq!(
        policy().admit(Some(&previous), now),
        Admission::Allow {
            window_start: now,
            attempt_count: 0
        }
    );
}

#[test]
fn test_cooldown_checked_before_rollover() {
    let t0 = start_time();
    let last = t0 + Duration::minutes(59) + Duration::seconds(50);
    let previous = record(t0, last, 2);

    assert_eq!(
        policy().admit(Some(&previous), t0 + Duration::hours(1)),
        Admission::Reject(ThrottleRejection::Cooldown {
            retry_after_seconds: 20
        })
    );
}

#[test]
fn test_window_continues_below_budget() {
    let t0 = start_time();
    let previous = record(t0, t0 + Duration::minutes(10), 4);

    assert_eq!(
        policy().admit(Some(&previous), t0 + Duration::minutes(11)),
        Admission::Allow {
            window_start: t0,
            attempt_count: 4
        }
    );
}

#[test]
fn test_is_settled() {
    let t0 = start_time();
    let previous = record(t0, t0 + Duration::minutes(10), 2);

    assert!(!policy().is_settled(&previous, t0 + Duration::minutes(30)));
    assert!(policy().is_settled(&previous, t0 + Duration::hours(1)));
}
