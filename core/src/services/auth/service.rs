//! Main authentication service implementation

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::entities::{Principal, RefreshRecord, TokenPair, TokenType};
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{BlacklistStore, PrincipalDirectory, RefreshTokenStore};
use crate::services::token::{TokenFactory, TokenServiceConfig, TokenSigner, TokenValidator};

/// Orchestrates token issuance, rotation and revocation.
///
/// Owns the refresh store and blacklist for writing; every other component
/// only reads them through [`TokenValidator`] or the delegation endpoint.
pub struct AuthService {
    factory: TokenFactory,
    validator: Arc<TokenValidator>,
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    blacklist: Arc<dyn BlacklistStore>,
    principals: Arc<dyn PrincipalDirectory>,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// # Arguments
    ///
    /// * `config` - Signing secret, issuer and token lifetimes
    /// * `refresh_tokens` - Store of consumable refresh tokens
    /// * `blacklist` - Store of revoked access tokens
    /// * `principals` - Directory of principals tokens are issued for
    pub fn new(
        config: &TokenServiceConfig,
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        blacklist: Arc<dyn BlacklistStore>,
        principals: Arc<dyn PrincipalDirectory>,
    ) -> Self {
        let signer = Arc::new(TokenSigner::from_config(config));
        let validator = Arc::new(TokenValidator::new(
            signer.clone(),
            blacklist.clone(),
            refresh_tokens.clone(),
        ));

        Self {
            factory: TokenFactory::new(signer, config),
            validator,
            refresh_tokens,
            blacklist,
            principals,
        }
    }

    /// Validator sharing this service's signer and stores
    pub fn validator(&self) -> Arc<TokenValidator> {
        self.validator.clone()
    }

    /// Check credentials and issue the initial token pair
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Fresh pair; the refresh half is persisted
    /// * `Err(DomainError::Auth(InvalidCredentials))` - Unknown email or wrong password
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        let principal = self
            .principals
            .authenticate(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let pair = self.factory.issue_pair(&principal)?;
        self.persist_refresh(&principal, &pair).await?;

        info!(principal_id = %principal.id, "Issued initial token pair");
        Ok(pair)
    }

    /// Exchange a refresh token, once, for a new pair
    ///
    /// # Arguments
    ///
    /// * `old_refresh_token` - The refresh token being spent
    /// * `presented_access_token` - The access token active at rotation time, if any;
    ///   it is blacklisted when it belongs to the same subject
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - New pair; the old refresh token is consumed
    /// * `Err(TokenError::PrincipalNotFound)` - Subject no longer exists
    /// * `Err(TokenError::WrongTokenType)` - An access token was presented
    /// * `Err(TokenError::Unauthorized)` - Invalid, expired, revoked or already consumed
    pub async fn rotate(
        &self,
        old_refresh_token: &str,
        presented_access_token: Option<&str>,
    ) -> DomainResult<TokenPair> {
        // Step 1: Extract the signature-verified subject
        let claims = self.validator.decode(old_refresh_token).map_err(|e| {
            warn!(reason = %e, "Rotation rejected");
            TokenError::Unauthorized
        })?;

        // Step 2: Resolve the principal
        let principal = self
            .principals
            .find_by_subject(&claims.sub)
            .await?
            .ok_or(TokenError::PrincipalNotFound)?;

        // Step 3: Type, expiry, subject and a live record
        match self
            .validator
            .check_refresh_usable(old_refresh_token, principal.subject())
            .await
        {
            Ok(_) => {}
            Err(DomainError::Token(e @ TokenError::WrongTokenType { .. })) => {
                warn!(reason = %e, "Rotation rejected");
                return Err(e.into());
            }
            Err(DomainError::Token(e)) => {
                warn!(reason = %e, principal_id = %principal.id, "Rotation rejected");
                if let Err(err) = self.refresh_tokens.delete(old_refresh_token).await {
                    warn!(error = %err, "Failed to delete stale refresh record");
                }
                return Err(TokenError::Unauthorized.into());
            }
            Err(e) => return Err(e),
        }

        // Step 4: Issue the new pair
        let pair = self.factory.issue_pair(&principal)?;

        // Step 5: Consume the old record; a concurrent rotation that got
        // there first leaves nothing to consume
        if self.refresh_tokens.consume(old_refresh_token).await?.is_none() {
            warn!(principal_id = %principal.id, "Refresh token already consumed");
            return Err(TokenError::Unauthorized.into());
        }

        // Step 6: Revoke the access token active at rotation time
        if let Some(access_token) = presented_access_token {
            self.blacklist_presented(access_token, &principal).await;
        }

        // Step 7: Persist the new refresh record
        self.persist_refresh(&principal, &pair).await?;

        debug!(principal_id = %principal.id, "Rotated refresh token");
        Ok(pair)
    }

    /// Revoke an access token and the principal's refresh records.
    ///
    /// A token that cannot be verified is a no-op: it stays usable until its
    /// natural expiry.
    pub async fn logout(&self, access_token: &str) -> DomainResult<()> {
        let claims = match self.validator.decode(access_token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(reason = %e, "Ignoring logout with unverifiable token");
                return Ok(());
            }
        };

        if let Some(principal) = self.principals.find_by_subject(&claims.sub).await? {
            let removed = self.refresh_tokens.delete_by_principal(principal.id).await?;
            debug!(principal_id = %principal.id, removed, "Deleted refresh records on logout");
        }

        self.blacklist.add(access_token, claims.expires_at()).await?;

        info!("Access token revoked on logout");
        Ok(())
    }

    /// Delegation check: validate an access token against its own subject,
    /// which must still name a known principal. Every failure is `false`.
    pub async fn validate_token(&self, token: &str) -> bool {
        let claims = match self.validator.decode(token) {
            Ok(claims) => claims,
            Err(e) => {
                warn!(reason = %e, "Delegated validation rejected");
                return false;
            }
        };

        match self.principals.find_by_subject(&claims.sub).await {
            Ok(Some(principal)) => self.validator.validate_access(token, principal.subject()).await,
            Ok(None) => {
                warn!(reason = %TokenError::PrincipalNotFound, "Delegated validation rejected");
                false
            }
            Err(e) => {
                error!(error = %e, "Principal lookup failed during delegated validation");
                false
            }
        }
    }

    async fn persist_refresh(&self, principal: &Principal, pair: &TokenPair) -> DomainResult<()> {
        let record = RefreshRecord::new(&pair.refresh_token, principal.id, pair.refresh_expires_at);
        self.refresh_tokens.save(record).await
    }

    // Best effort: the token still expires naturally if this fails.
    async fn blacklist_presented(&self, access_token: &str, principal: &Principal) {
        let claims = match self.validator.decode(access_token) {
            Ok(c) if c.token_type == TokenType::Access && c.sub == principal.subject() => c,
            Ok(_) => {
                warn!(principal_id = %principal.id, "Presented token is not this principal's access token");
                return;
            }
            Err(e) => {
                warn!(reason = %e, "Presented access token not blacklisted");
                return;
            }
        };

        if let Err(e) = self.blacklist.add(access_token, claims.expires_at()).await {
            error!(error = %e, principal_id = %principal.id, "Failed to blacklist access token during rotation");
        }
    }
}
