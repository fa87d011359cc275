//! In-memory blacklist store

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::errors::DomainError;

use super::r#trait::BlacklistStore;

/// Blacklist backed by a `HashMap` of token value to original expiry
#[derive(Default)]
pub struct InMemoryBlacklistStore {
    entries: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryBlacklistStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl BlacklistStore for InMemoryBlacklistStore {
    async fn add(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        let mut entries = self.entries.write().await;
        entries.entry(token.to_string()).or_insert(expires_at);
        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, DomainError> {
        Ok(self.entries.read().await.contains_key(token))
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        Ok(before - entries.len())
    }
}
