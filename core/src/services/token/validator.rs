//! Local validation of access and refresh tokens

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::entities::{Claims, RefreshRecord, TokenType};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{BlacklistStore, RefreshTokenStore};

use super::signer::TokenSigner;

/// Verifies signature, type, expiry and subject, then consults the
/// blacklist (access tokens) or the refresh store (refresh tokens).
///
/// Every store read happens on every call; nothing is cached.
pub struct TokenValidator {
    signer: Arc<TokenSigner>,
    blacklist: Arc<dyn BlacklistStore>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
}

impl TokenValidator {
    pub fn new(
        signer: Arc<TokenSigner>,
        blacklist: Arc<dyn BlacklistStore>,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
    ) -> Self {
        Self {
            signer,
            blacklist,
            refresh_tokens,
        }
    }

    /// Signature check only
    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        self.signer.verify(token)
    }

    /// Run all five access checks, returning the claims on success
    pub async fn check_access(&self, token: &str, expected_subject: &str) -> Result<Claims, DomainError> {
        let claims = self.signer.verify(token)?;
        check_claims(&claims, TokenType::Access, expected_subject)?;

        if self.blacklist.contains(token).await? {
            return Err(TokenError::Revoked.into());
        }

        Ok(claims)
    }

    /// Boolean form of [`check_access`](Self::check_access); any failure,
    /// storage errors included, yields `false`
    pub async fn validate_access(&self, token: &str, expected_subject: &str) -> bool {
        match self.check_access(token, expected_subject).await {
            Ok(_) => true,
            Err(e) => {
                warn!(reason = %e, "Access token rejected");
                false
            }
        }
    }

    /// Validate an access token against its own subject claim.
    ///
    /// Used where the caller has no independent notion of who the bearer is,
    /// i.e. the bearer middleware and the delegation endpoint.
    pub async fn authenticate(&self, token: &str) -> Result<Claims, DomainError> {
        let claims = self.signer.verify(token)?;
        self.check_access(token, &claims.sub).await
    }

    /// Run the refresh checks: signature, type, expiry, subject and a live
    /// record in the refresh store
    pub async fn check_refresh_usable(
        &self,
        token: &str,
        expected_subject: &str,
    ) -> Result<(Claims, RefreshRecord), DomainError> {
        let claims = self.signer.verify(token)?;
        check_claims(&claims, TokenType::Refresh, expected_subject)?;

        match self.refresh_tokens.find(token).await? {
            Some(record) if !record.is_expired() => Ok((claims, record)),
            // Absent, consumed and expired records are indistinguishable to the caller
            _ => Err(TokenError::Unauthorized.into()),
        }
    }

    pub async fn validate_refresh_usable(&self, token: &str, expected_subject: &str) -> bool {
        match self.check_refresh_usable(token, expected_subject).await {
            Ok(_) => true,
            Err(e) => {
                warn!(reason = %e, "Refresh token rejected");
                false
            }
        }
    }
}

/// Type, expiry and subject checks, in that order
pub fn check_claims(claims: &Claims, expected: TokenType, expected_subject: &str) -> Result<(), TokenError> {
    if claims.token_type != expected {
        return Err(TokenError::WrongTokenType { expected });
    }
    if claims.is_expired_at(Utc::now()) {
        debug!(exp = claims.exp, "Token past expiry");
        return Err(TokenError::Expired);
    }
    if claims.sub != expected_subject {
        return Err(TokenError::SubjectMismatch);
    }
    Ok(())
}
