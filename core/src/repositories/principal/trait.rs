//! Principal directory trait, the interface to the external user store.

use async_trait::async_trait;

use crate::domain::entities::Principal;
use crate::errors::DomainError;

/// Read-only view of the user store used by the token core
#[async_trait]
pub trait PrincipalDirectory: Send + Sync {
    /// Find a principal by the subject claim (email)
    async fn find_by_subject(&self, subject: &str) -> Result<Option<Principal>, DomainError>;

    /// Check credentials, returning the principal when they match
    async fn authenticate(&self, email: &str, password: &str) -> Result<Option<Principal>, DomainError>;
}
