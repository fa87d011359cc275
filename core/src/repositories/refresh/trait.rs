//! Refresh store trait defining persistence of issued refresh tokens.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::RefreshRecord;
use crate::errors::DomainError;

/// Persistent mapping of refresh-token value to owning principal and expiry.
///
/// Implementations key records by the exact token string (or a digest of it)
/// and must make [`consume`](RefreshTokenStore::consume) a single atomic
/// conditional delete-and-return, so that two concurrent callers can never
/// both obtain the same record.
#[async_trait]
pub trait RefreshTokenStore: Send + Sync {
    /// Persist a newly issued refresh token
    async fn save(&self, record: RefreshRecord) -> Result<(), DomainError>;

    /// Look up the record for a token value without consuming it
    async fn find(&self, token: &str) -> Result<Option<RefreshRecord>, DomainError>;

    /// Atomically remove and return the record for a token value
    ///
    /// # Returns
    /// * `Ok(Some(record))` - This caller consumed the record
    /// * `Ok(None)` - No record (never issued, revoked, or consumed by someone else)
    async fn consume(&self, token: &str) -> Result<Option<RefreshRecord>, DomainError>;

    /// Delete the record for a token value; idempotent
    async fn delete(&self, token: &str) -> Result<bool, DomainError>;

    /// All records owned by a principal
    async fn find_by_principal(&self, principal_id: Uuid) -> Result<Vec<RefreshRecord>, DomainError>;

    /// Delete every record owned by a principal, returning how many were removed
    async fn delete_by_principal(&self, principal_id: Uuid) -> Result<usize, DomainError>;

    /// Remove records past their expiry
    async fn purge_expired(&self) -> Result<usize, DomainError>;
}
