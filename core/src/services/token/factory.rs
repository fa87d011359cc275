//! Token factory building access and refresh tokens for a principal

use std::sync::Arc;

use crate::domain::entities::{Claims, IssuedToken, Principal, TokenPair, TokenType};
use crate::errors::TokenError;

use super::config::TokenServiceConfig;
use super::signer::TokenSigner;

/// Builds claim sets from configured lifetimes and signs them.
///
/// Pure construction: persisting the refresh half is the caller's job.
pub struct TokenFactory {
    signer: Arc<TokenSigner>,
    access_ttl_secs: i64,
    refresh_ttl_secs: i64,
}

impl TokenFactory {
    pub fn new(signer: Arc<TokenSigner>, config: &TokenServiceConfig) -> Self {
        Self {
            signer,
            access_ttl_secs: config.access_token_ttl_secs,
            refresh_ttl_secs: config.refresh_token_ttl_secs,
        }
    }

    pub fn issue_access_token(&self, principal: &Principal) -> Result<String, TokenError> {
        self.issue(principal, TokenType::Access).map(|t| t.value)
    }

    pub fn issue_refresh_token(&self, principal: &Principal) -> Result<String, TokenError> {
        self.issue(principal, TokenType::Refresh).map(|t| t.value)
    }

    /// Sign a token of the given type, returning it with its expiry
    pub fn issue(&self, principal: &Principal, token_type: TokenType) -> Result<IssuedToken, TokenError> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl_secs,
            TokenType::Refresh => self.refresh_ttl_secs,
        };
        let claims = Claims::new(
            principal.subject(),
            token_type,
            principal.roles.clone(),
            self.signer.issuer(),
            ttl,
        )?;

        let value = self.signer.sign(&claims)?;
        Ok(IssuedToken {
            value,
            expires_at: claims.expires_at(),
        })
    }

    pub fn issue_pair(&self, principal: &Principal) -> Result<TokenPair, TokenError> {
        let access = self.issue(principal, TokenType::Access)?;
        let refresh = self.issue(principal, TokenType::Refresh)?;
        Ok(TokenPair::new(access, refresh))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factory(access: i64, refresh: i64) -> (TokenFactory, Arc<TokenSigner>) {
        let config = TokenServiceConfig::new("0123456789abcdef0123456789abcdef", access, refresh);
        let signer = Arc::new(TokenSigner::from_config(&config));
        (TokenFactory::new(signer.clone(), &config), signer)
    }

    fn alice() -> Principal {
        Principal::new("alice@example.com", "Alice", vec!["ADMIN".into(), "USER".into()])
    }

    #[test]
    fn test_access_token_claims() {
        let (factory, signer) = factory(900, 604800);
        let token = factory.issue_access_token(&alice()).unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.roles, vec!["ADMIN".to_string(), "USER".to_string()]);
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims.iss, "tasktrack-auth");
    }

    #[test]
    fn test_refresh_token_claims() {
        let (factory, signer) = factory(900, 604800);
        let token = factory.issue_refresh_token(&alice()).unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.token_type, TokenType::Refresh);
        assert!(claims.roles.is_empty());
        assert_eq!(claims.exp - claims.iat, 604800);
    }

    #[test]
    fn test_pair_is_distinct_on_every_issue() {
        let (factory, _) = factory(900, 604800);
        let first = factory.issue_pair(&alice()).unwrap();
        let second = factory.issue_pair(&alice()).unwrap();

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
        assert!(first.refresh_expires_at > first.access_expires_at);
    }

    #[test]
    fn test_out_of_range_lifetime_is_generation_failure() {
        let (factory, _) = factory(900, i64::MAX);

        assert!(factory.issue_access_token(&alice()).is_ok());
        assert_eq!(factory.issue_pair(&alice()).unwrap_err(), TokenError::GenerationFailed);
    }
}
