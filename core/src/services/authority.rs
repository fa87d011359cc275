//! The token authority capability: "is this access token currently valid?"
//!
//! Callers holding the signing secret and store access use
//! [`LocalTokenAuthority`]; everyone else asks the owning service over HTTP
//! (the remote strategy lives in the infrastructure crate).

use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::DomainError;
use crate::services::token::TokenValidator;

/// Validates access tokens against their own subject claim
#[async_trait]
pub trait TokenAuthority: Send + Sync {
    /// # Returns
    /// * `Ok(true)` - Token is currently valid
    /// * `Ok(false)` - Token is invalid, expired, revoked or of the wrong type
    /// * `Err(DomainError)` - The authority could not answer; callers fail closed
    async fn validate_access(&self, token: &str) -> Result<bool, DomainError>;
}

/// Authority backed by a local validator (shared secret + direct store reads)
pub struct LocalTokenAuthority {
    validator: Arc<TokenValidator>,
}

impl LocalTokenAuthority {
    pub fn new(validator: Arc<TokenValidator>) -> Self {
        Self { validator }
    }
}

#[async_trait]
impl TokenAuthority for LocalTokenAuthority {
    async fn validate_access(&self, token: &str) -> Result<bool, DomainError> {
        match self.validator.authenticate(token).await {
            Ok(_) => Ok(true),
            Err(DomainError::Token(e)) => {
                tracing::warn!(reason = %e, "Local validation rejected token");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
