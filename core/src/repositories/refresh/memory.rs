//! In-memory refresh store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::RefreshRecord;
use crate::errors::DomainError;

use super::r#trait::RefreshTokenStore;

/// Refresh store backed by a `HashMap` behind a tokio `RwLock`.
///
/// Used for development and tests; state is lost on restart.
#[derive(Default)]
pub struct InMemoryRefreshTokenStore {
    records: RwLock<HashMap<String, RefreshRecord>>,
}

impl InMemoryRefreshTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RefreshTokenStore for InMemoryRefreshTokenStore {
    async fn save(&self, record: RefreshRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().await;
        records.insert(record.token.clone(), record);
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records.get(token).cloned())
    }

    async fn consume(&self, token: &str) -> Result<Option<RefreshRecord>, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(token))
    }

    async fn delete(&self, token: &str) -> Result<bool, DomainError> {
        let mut records = self.records.write().await;
        Ok(records.remove(token).is_some())
    }

    async fn find_by_principal(&self, principal_id: Uuid) -> Result<Vec<RefreshRecord>, DomainError> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.principal_id == principal_id)
            .cloned()
            .collect())
    }

    async fn delete_by_principal(&self, principal_id: Uuid) -> Result<usize, DomainError> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.principal_id != principal_id);
        Ok(before - records.len())
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        let now = Utc::now();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|_, r| r.expires_at > now);
        Ok(before - records.len())
    }
}
