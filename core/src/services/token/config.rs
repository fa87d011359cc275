//! Configuration for the token services

use tt_shared::JwtConfig;

/// Signing key, issuer and lifetimes injected into the signer and factory
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// Shared HMAC secret
    pub secret: String,
    /// Issuer written into and required on every token
    pub issuer: String,
    /// Access token lifetime in seconds
    pub access_token_ttl_secs: i64,
    /// Refresh token lifetime in seconds
    pub refresh_token_ttl_secs: i64,
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .finish()
    }
}

impl TokenServiceConfig {
    pub fn new(secret: impl Into<String>, access_token_ttl_secs: i64, refresh_token_ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            issuer: tt_shared::config::auth::DEFAULT_ISSUER.to_string(),
            access_token_ttl_secs,
            refresh_token_ttl_secs,
        }
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

impl From<&JwtConfig> for TokenServiceConfig {
    fn from(config: &JwtConfig) -> Self {
        Self {
            secret: config.secret.clone(),
            issuer: config.issuer.clone(),
            access_token_ttl_secs: config.access_token_expiry,
            refresh_token_ttl_secs: config.refresh_token_expiry,
        }
    }
}
