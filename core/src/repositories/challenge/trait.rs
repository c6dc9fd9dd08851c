//! Challenge store trait defining the interface for pending challenge state.

use async_trait::async_trait;

use crate::domain::entities::challenge::ChallengeRecord;
use crate::domain::value_objects::phone_key::PhoneKey;
use crate::errors::DomainError;

/// Predicate used by [`ChallengeStore::remove_where`]
pub type RecordPredicate<'a> = &'a (dyn Fn(&PhoneKey, &ChallengeRecord) -> bool + Send + Sync);

/// Keyed storage of the single live challenge per phone key
///
/// Implementations only need to make each call atomic on its own; callers
/// serialize multi-step operations on the same key themselves.
///
/// # Example
/// ```no_run
/// # use cb_core::repositories::ChallengeStore;
/// # use cb_core::domain::PhoneKey;
/// # async fn example(store: &impl ChallengeStore) -> Result<(), Box<dyn std::error::Error>> {
/// let key = PhoneKey::normalize("0501234567")?;
/// if let Some(record) = store.get(&key).await? {
///     println!("challenge expires at {}", record.expires_at);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ChallengeStore: Send + Sync {
    /// Fetch the current record for a key
    async fn get(&self, key: &PhoneKey) -> Result<Option<ChallengeRecord>, DomainError>;

    /// Insert or overwrite the record for a key
    async fn put(&self, key: &PhoneKey, record: ChallengeRecord) -> Result<(), DomainError>;

    /// Remove the record for a key
    ///
    /// # Returns
    /// * `Ok(true)` - A record existed and was removed
    /// * `Ok(false)` - Nothing was stored for the key
    async fn delete(&self, key: &PhoneKey) -> Result<bool, DomainError>;

    /// Remove every record the predicate selects, returning how many went
    async fn remove_where(&self, predicate: RecordPredicate<'_>) -> Result<usize, DomainError>;

    /// Number of live records
    async fn count(&self) -> Result<usize, DomainError>;
}
