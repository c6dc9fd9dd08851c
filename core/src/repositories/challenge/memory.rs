//! Process-local challenge store

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::r#trait::{ChallengeStore, RecordPredicate};
use crate::domain::entities::challenge::ChallengeRecord;
use crate::domain::value_objects::phone_key::PhoneKey;
use crate::errors::DomainError;

/// In-memory [`ChallengeStore`] owned by a single process
///
/// Contents are lost on restart.
#[derive(Debug, Default)]
pub struct InMemoryChallengeStore {
    records: RwLock<HashMap<PhoneKey, ChallengeRecord>>,
}

impl InMemoryChallengeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ChallengeStore for InMemoryChallengeStore {
    async fn get(&self, key: &PhoneKey) -> Result<Option<ChallengeRecord>, DomainError> {
        Ok(self.records.read().await.get(key).cloned())
    }

    async fn put(&self, key: &PhoneKey, record: ChallengeRecord) -> Result<(), DomainError> {
        self.records.write().await.insert(key.clone(), record);
        Ok(())
    }

    async fn delete(&self, key: &PhoneKey) -> Result<bool, DomainError> {
        Ok(self.records.write().await.remove(key).is_some())
    }

    async fn remove_where(&self, predicate: RecordPredicate<'_>) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|key, record| !predicate(key, record));
        Ok(before - records.len())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.records.read().await.len())
    }
}
