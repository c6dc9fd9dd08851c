//! Main OTP service implementation

use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;

use cb_shared::config::DispatchMode;

use crate::domain::entities::challenge::{generate_code, hash_code, ChallengeRecord};
use crate::domain::value_objects::dispatch::{
    BookingConfirmation, DispatchReceipt, DispatchRequest, MessageStatus, OperationTag,
};
use crate::domain::value_objects::phone_key::PhoneKey;
use crate::errors::{DomainError, DomainResult, OtpError};
use crate::repositories::ChallengeStore;

use super::clock::{Clock, SystemClock};
use super::config::OtpServiceConfig;
use super::dispatch::Dispatcher;
use super::key_lock::KeyLocks;
use super::messages;
use super::throttle::{Admission, ThrottlePolicy};
use super::types::{IssuedChallenge, SweepResult, VerificationOutcome};

/// Phone verification service: issues, verifies and sweeps challenges
///
/// Issuance and verification for one phone key run under that key's lock.
/// The SMS itself is sent after the lock is released; if sending fails the
/// record written for it is rolled back, so only delivered codes count
/// against the throttle.
pub struct OtpService<S: ChallengeStore> {
    /// Challenge storage
    store: Arc<S>,
    /// Real/simulated transport selection
    dispatcher: Dispatcher,
    /// Issuance throttle
    throttle: ThrottlePolicy,
    /// Serializes work on the same phone key
    locks: KeyLocks,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: OtpServiceConfig,
}

impl<S: ChallengeStore> OtpService<S> {
    /// Create a new OTP service using the system clock
    pub fn new(store: Arc<S>, dispatcher: Dispatcher, config: OtpServiceConfig) -> Self {
        Self::with_clock(store, dispatcher, config, Arc::new(SystemClock))
    }

    /// Create a new OTP service with an explicit time source
    pub fn with_clock(
        store: Arc<S>,
        dispatcher: Dispatcher,
        config: OtpServiceConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            dispatcher,
            throttle: ThrottlePolicy::from(&config),
            locks: KeyLocks::new(),
            clock,
            config,
        }
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        self.dispatcher.mode()
    }

    /// Whether messages for `tag` are really transmitted
    pub fn will_transmit(&self, tag: OperationTag) -> bool {
        self.dispatcher.will_transmit(tag)
    }

    /// Normalize a raw phone string and issue a challenge for it
    pub async fn request_challenge(&self, raw_phone: &str) -> DomainResult<IssuedChallenge> {
        let key = PhoneKey::normalize(raw_phone)?;
        self.issue(&key, self.clock.now()).await
    }

    /// Normalize a raw phone string and check a submitted code
    pub async fn submit_challenge(
        &self,
        raw_phone: &str,
        code: &str,
    ) -> DomainResult<VerificationOutcome> {
        let key = PhoneKey::normalize(raw_phone)?;
        self.verify(&key, code, self.clock.now()).await
    }

    /// Issue a new challenge for `key`
    ///
    /// The new record supersedes any previous one. It is written before the
    /// message is sent so concurrent requests see the cooldown; a failed
    /// send restores the previous record.
    ///
    /// # Errors
    ///
    /// * `OtpError::Throttled` - cooldown or window budget not satisfied
    /// * `OtpError::Dispatch` - the transport failed; nothing was counted
    /// * `DomainError::Internal` - expiry or resend time is not representable
    pub async fn issue(&self, key: &PhoneKey, now: DateTime<Utc>) -> DomainResult<IssuedChallenge> {
        let code = generate_code();
        let expires_at = offset(now, self.config.ttl(), "code expiry")?;
        let next_resend_at = offset(now, self.config.cooldown(), "resend time")?;

        let (previous, written_hash) = {
            let _guard = self.locks.lock(key).await;
            let previous = self.store.get(key).await?;

            let (window_start, attempt_count) = match self.throttle.admit(previous.as_ref(), now) {
                Admission::Allow {
                    window_start,
                    attempt_count,
                } => (window_start, attempt_count),
                Admission::Reject(rejection) => {
                    tracing::warn!(
                        phone = %key.masked(),
                        retry_after = rejection.retry_after_seconds(),
                        event = "otp_throttled",
                        "Verification code request throttled"
                    );
                    return Err(OtpError::Throttled(rejection).into());
                }
            };

            let record = ChallengeRecord {
                secret_hash: hash_code(&code),
                expires_at,
                attempt_window_start: window_start,
                attempt_count: attempt_count.saturating_add(1),
                last_issued_at: now,
            };
            let written_hash = record.secret_hash.clone();
            self.store.put(key, record).await?;
            (previous, written_hash)
        };

        let request = DispatchRequest::new(
            key.clone(),
            messages::otp_body(&self.config.brand, &code, self.config.ttl_minutes),
            OperationTag::SendOtp,
        );

        match self.dispatcher.dispatch(&request).await {
            Ok(receipt) => {
                tracing::info!(
                    phone = %key.masked(),
                    message_id = %receipt.id,
                    simulated = receipt.simulated,
                    event = "otp_issued",
                    "Issued verification code"
                );
                Ok(IssuedChallenge {
                    phone: key.clone(),
                    receipt,
                    expires_at,
                    next_resend_at,
                    resend_after_seconds: self.config.cooldown_seconds,
                })
            }
            Err(err) => {
                tracing::error!(
                    phone = %key.masked(),
                    error = %err,
                    retryable = err.is_retryable(),
                    event = "otp_dispatch_failed",
                    "Failed to dispatch verification code"
                );
                self.roll_back(key, previous, &written_hash).await?;
                Err(OtpError::Dispatch(err).into())
            }
        }
    }

    /// Undo the record written by a failed issuance
    ///
    /// Skipped when a later operation already replaced or consumed it.
    async fn roll_back(
        &self,
        key: &PhoneKey,
        previous: Option<ChallengeRecord>,
        written_hash: &str,
    ) -> DomainResult<()> {
        let _guard = self.locks.lock(key).await;
        let current = self.store.get(key).await?;
        if current.map(|record| record.secret_hash) != Some(written_hash.to_string()) {
            return Ok(());
        }

        match previous {
            Some(record) => self.store.put(key, record).await?,
            None => {
                self.store.delete(key).await?;
            }
        }
        tracing::info!(
            phone = %key.masked(),
            event = "otp_rolled_back",
            "Rolled back challenge after failed dispatch"
        );
        Ok(())
    }

    /// Check `submitted` against the live challenge for `key`
    ///
    /// Existence is checked before expiry and expiry before the code, so an
    /// expired code reports `Expired` even when it matches.
    pub async fn verify(
        &self,
        key: &PhoneKey,
        submitted: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<VerificationOutcome> {
        let _guard = self.locks.lock(key).await;

        let Some(record) = self.store.get(key).await? else {
            tracing::info!(
                phone = %key.masked(),
                event = "otp_no_challenge",
                "Verification attempted without a pending code"
            );
            return Ok(VerificationOutcome::NoChallenge);
        };

        if record.is_expired(now) {
            self.store.delete(key).await?;
            tracing::info!(
                phone = %key.masked(),
                event = "otp_expired",
                "Verification code expired"
            );
            return Ok(VerificationOutcome::Expired);
        }

        if !record.matches(submitted) {
            tracing::warn!(
                phone = %key.masked(),
                event = "otp_mismatch",
                "Invalid verification code submitted"
            );
            return Ok(VerificationOutcome::Mismatch);
        }

        self.store.delete(key).await?;
        tracing::info!(
            phone = %key.masked(),
            event = "otp_verified",
            "Verification code accepted"
        );
        Ok(VerificationOutcome::Verified)
    }

    /// Send the booking confirmation notice
    ///
    /// Not throttled. Simulated unless the dispatch mode is `all`.
    pub async fn send_confirmation(
        &self,
        raw_phone: &str,
        booking: &BookingConfirmation,
    ) -> DomainResult<DispatchReceipt> {
        let key = PhoneKey::normalize(raw_phone)?;
        let request = DispatchRequest::new(
            key.clone(),
            messages::confirmation_body(&self.config.brand, booking),
            OperationTag::SendConfirmation,
        );

        let receipt = self.dispatcher.dispatch(&request).await.map_err(|err| {
            tracing::error!(
                phone = %key.masked(),
                error = %err,
                event = "confirmation_dispatch_failed",
                "Failed to dispatch booking confirmation"
            );
            OtpError::Dispatch(err)
        })?;

        tracing::info!(
            phone = %key.masked(),
            message_id = %receipt.id,
            simulated = receipt.simulated,
            event = "confirmation_sent",
            "Booking confirmation dispatched"
        );
        Ok(receipt)
    }

    /// Delivery status of a message sent through the real transport
    pub async fn message_status(&self, sid: &str) -> DomainResult<MessageStatus> {
        match self.dispatcher.message_status(sid).await {
            Some(status) => Ok(status?),
            None => Err(DomainError::Validation {
                message: format!(
                    "SMS transport disabled in dispatch mode '{}'",
                    self.dispatcher.mode()
                ),
            }),
        }
    }

    /// Remove records that are expired and no longer affect throttling
    pub async fn sweep_expired(&self) -> DomainResult<SweepResult> {
        let now = self.clock.now();
        let throttle = &self.throttle;
        let records_removed = self
            .store
            .remove_where(&|_, record: &ChallengeRecord| {
                record.is_expired(now) && throttle.is_settled(record, now)
            })
            .await?;
        let locks_released = self.locks.prune();

        tracing::debug!(
            records_removed,
            locks_released,
            event = "otp_sweep",
            "Swept stale verification challenges"
        );
        Ok(SweepResult {
            records_removed,
            locks_released,
        })
    }
}

/// `now + by`, or an internal error when the result leaves chrono's range
fn offset(now: DateTime<Utc>, by: Duration, what: &str) -> DomainResult<DateTime<Utc>> {
    now.checked_add_signed(by).ok_or_else(|| DomainError::Internal {
        message: format!("{} out of range for offset {}s", what, by.num_seconds()),
    })
}

impl<S: ChallengeStore + 'static> OtpService<S> {
    /// Start the periodic sweep as a background task
    ///
    /// Returns `None` when the sweep interval is 0.
    pub fn start_sweep_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if self.config.sweep_interval_seconds == 0 {
            tracing::warn!("Challenge sweep is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.sweep_interval_seconds);

        Some(tokio::spawn(async move {
            tracing::info!(
                "Challenge sweep started - will run every {} seconds",
                self.config.sweep_interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.tick().await;

            loop {
                interval_timer.tick().await;

                if let Err(e) = self.sweep_expired().await {
                    tracing::error!("Challenge sweep failed: {}", e);
                }
            }
        }))
    }
}
