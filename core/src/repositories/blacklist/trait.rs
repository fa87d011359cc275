//! Blacklist store trait for revoked access tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::DomainError;

/// Persistent set of access tokens revoked before their natural expiry.
///
/// Consulted on every local validation of an access token. Entries carry the
/// token's original expiry so housekeeping can drop them once the token would
/// have expired anyway.
#[async_trait]
pub trait BlacklistStore: Send + Sync {
    /// Revoke a token until `expires_at`; adding an existing entry is a no-op
    async fn add(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), DomainError>;

    /// Whether the token has been revoked
    async fn contains(&self, token: &str) -> Result<bool, DomainError>;

    /// Drop entries whose token has expired naturally
    async fn purge_expired(&self) -> Result<usize, DomainError>;
}
