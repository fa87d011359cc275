//! MySQL implementation of the refresh store.
//!
//! Rows are keyed by the SHA-256 digest of the token. `consume` locks the row
//! with `SELECT ... FOR UPDATE` and deletes it in the same transaction, so a
//! concurrent consumer of the same token blocks and then finds nothing.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use tt_core::domain::entities::RefreshRecord;
use tt_core::errors::DomainError;
use tt_core::repositories::RefreshTokenStore;

use crate::database::storage_error;
use crate::digest::hash_token;

/// MySQL implementation of RefreshTokenStore
pub struct MySqlRefreshTokenStore {
    pool: MySqlPool,
}

impl MySqlRefreshTokenStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Map a row to a record. `token` is the presented value when known;
    /// listing queries only have the digest.
    fn row_to_record(row: &sqlx::mysql::MySqlRow, token: Option<&str>) -> Result<RefreshRecord, DomainError> {
        let principal_id: String = row.try_get("principal_id").map_err(storage_error)?;
        let token = match token {
            Some(t) => t.to_string(),
            None => row.try_get("token_hash").map_err(storage_error)?,
        };

        Ok(RefreshRecord {
            token,
            principal_id: Uuid::parse_str(&principal_id)
                .map_err(|e| DomainError::storage(format!("Invalid principal UUID: {}", e)))?,
            expires_at: row.try_get::<DateTime<Utc>, _>("expires_at").map_err(storage_error)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at").map_err(storage_error)?,
        })
    }
}

#[async_trait]
impl RefreshTokenStore for MySqlRefreshTokenStore {
    async fn save(&self, record: RefreshRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO refresh_tokens (token_hash, principal_id, expires_at, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(hash_token(&record.token))
        .bind(record.principal_id.to_string())
        .bind(record.expires_at)
        .bind(record.created_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<RefreshRecord>, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT token_hash, principal_id, expires_at, created_at
            FROM refresh_tokens
            WHERE token_hash = ?
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        row.map(|r| Self::row_to_record(&r, Some(token))).transpose()
    }

    async fn consume(&self, token: &str) -> Result<Option<RefreshRecord>, DomainError> {
        let token_hash = hash_token(token);
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        let row = sqlx::query(
            r#"
            SELECT token_hash, principal_id, expires_at, created_at
            FROM refresh_tokens
            WHERE token_hash = ?
            FOR UPDATE
            "#,
        )
        .bind(&token_hash)
        .fetch_optional(&mut *tx)
        .await
        .map_err(storage_error)?;

        let Some(row) = row else {
            tx.rollback().await.map_err(storage_error)?;
            return Ok(None);
        };
        let record = Self::row_to_record(&row, Some(token))?;

        sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
            .bind(&token_hash)
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        tx.commit().await.map_err(storage_error)?;
        Ok(Some(record))
    }

    async fn delete(&self, token: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_principal(&self, principal_id: Uuid) -> Result<Vec<RefreshRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT token_hash, principal_id, expires_at, created_at
            FROM refresh_tokens
            WHERE principal_id = ?
            ORDER BY created_at DESC
            "#,
        )
        .bind(principal_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(|r| Self::row_to_record(r, None)).collect()
    }

    async fn delete_by_principal(&self, principal_id: Uuid) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE principal_id = ?")
            .bind(principal_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() as usize)
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() as usize)
    }
}
