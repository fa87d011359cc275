//! MySQL implementation of the blacklist store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::MySqlPool;

use tt_core::errors::DomainError;
use tt_core::repositories::BlacklistStore;

use crate::database::storage_error;
use crate::digest::hash_token;

/// MySQL implementation of BlacklistStore, keyed by token digest
pub struct MySqlBlacklistStore {
    pool: MySqlPool,
}

impl MySqlBlacklistStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BlacklistStore for MySqlBlacklistStore {
    async fn add(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT IGNORE INTO token_blacklist (token_hash, expires_at, created_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(hash_token(token))
        .bind(expires_at)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn contains(&self, token: &str) -> Result<bool, DomainError> {
        let row = sqlx::query("SELECT 1 FROM token_blacklist WHERE token_hash = ? LIMIT 1")
            .bind(hash_token(token))
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(row.is_some())
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM token_blacklist WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() as usize)
    }
}
