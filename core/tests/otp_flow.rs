//! End-to-end scenarios for challenge issuance and verification

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone, Utc};
    use std::sync::{Arc, Mutex};

    use cb_core::domain::{DispatchReceipt, DispatchRequest, MessageStatus, PhoneKey};
    use cb_core::errors::DispatchError;
    use cb_core::repositories::{ChallengeStore, InMemoryChallengeStore};
    use cb_core::services::otp::{
        Clock, Dispatcher, ManualClock, OtpService, OtpServiceConfig, SmsTransport,
        VerificationOutcome,
    };
    use cb_shared::config::DispatchMode;

    // Captures message bodies so the test can read the code
    #[derive(Default)]
    struct Outbox {
        bodies: Mutex<Vec<String>>,
    }

    impl Outbox {
        fn last_code(&self) -> String {
            let bodies = self.bodies.lock().unwrap();
            let body = bodies.last().expect("a message was sent");
            body.split(": ").nth(1).unwrap()[..6].to_string()
        }
    }

    #[async_trait]
    impl SmsTransport for Outbox {
        async fn send(&self, request: &DispatchRequest) -> Result<DispatchReceipt, DispatchError> {
            self.bodies.lock().unwrap().push(request.body.clone());
            Ok(DispatchReceipt::delivered("SM0001", "queued"))
        }

        async fn message_status(&self, _sid: &str) -> Result<MessageStatus, DispatchError> {
            Err(DispatchError::Unavailable {
                message: "not tracked".to_string(),
            })
        }

        fn name(&self) -> &'static str {
            "outbox"
        }
    }

    fn setup() -> (
        OtpService<InMemoryChallengeStore>,
        Arc<InMemoryChallengeStore>,
        Arc<Outbox>,
        Arc<ManualClock>,
    ) {
        let store = Arc::new(InMemoryChallengeStore::new());
        let outbox = Arc::new(Outbox::default());
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2026, 5, 10, 12, 0, 0).unwrap(),
        ));
        let service = OtpService::with_clock(
            store.clone(),
            Dispatcher::new(DispatchMode::OtpOnly, Some(outbox.clone() as Arc<dyn SmsTransport>)),
            OtpServiceConfig::default(),
            clock.clone(),
        );
        (service, store, outbox, clock)
    }

    #[tokio::test]
    async fn test_wrong_then_right_code_then_reissue() {
        let (service, store, outbox, clock) = setup();
        let key = PhoneKey::normalize("+972501234567").unwrap();
        let t0 = clock.now();

        service.issue(&key, t0).await.unwrap();
        let first_code = outbox.last_code();
        let wrong_code = if first_code == "000000" { "111111" } else { "000000" };

        let outcome = service
            .verify(&key, wrong_code, t0 + Duration::minutes(1))
            .await
            .unwrap();
        assert_eq!(outcome, VerificationOutcome::Mismatch);

        let outcome = service
            .verify(&key, &first_code, t0 + Duration::minutes(4))
            .await
            .unwrap();
        assert_eq!(outcome, VerificationOutcome::Verified);
        assert!(store.get(&key).await.unwrap().is_none());

        let reissue_at = t0 + Duration::minutes(4) + Duration::seconds(1);
        service.issue(&key, reissue_at).await.unwrap();
        let second_code = outbox.last_code();

        let record = store.get(&key).await.unwrap().unwrap();
        assert_eq!(record.last_issued_at, reissue_at);
        assert_eq!(record.expires_at, reissue_at + Duration::minutes(5));

        if first_code != second_code {
            let outcome = service
                .verify(&key, &first_code, reissue_at + Duration::seconds(5))
                .await
                .unwrap();
            assert_eq!(outcome, VerificationOutcome::Mismatch);
        }
        let outcome = service
            .verify(&key, &second_code, reissue_at + Duration::seconds(10))
            .await
            .unwrap();
        assert_eq!(outcome, VerificationOutcome::Verified);
    }

    #[tokio::test]
    async fn test_local_and_international_spellings_share_a_challenge() {
        let (service, _store, outbox, clock) = setup();

        service.request_challenge("٠٥٠١٢٣٤٥٦٧").await.unwrap();
        let code = outbox.last_code();

        clock.advance(Duration::seconds(5));
        let throttled = service.request_challenge("972501234567").await;
        assert!(throttled.is_err());

        let outcome = service.submit_challenge("+972 50-123-4567", &code).await.unwrap();
        assert_eq!(outcome, VerificationOutcome::Verified);
    }

    #[tokio::test]
    async fn test_after_expiry_record_is_gone() {
        let (service, store, outbox, clock) = setup();
        service.request_challenge("0501234567").await.unwrap();
        let code = outbox.last_code();

        clock.advance(Duration::minutes(6));
        let outcome = service.submit_challenge("0501234567", &code).await.unwrap();

        assert_eq!(outcome, VerificationOutcome::Expired);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
