//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::TokenError;

/// Discriminates the two kinds of token the authority signs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Short-lived credential for protected resources
    Access,
    /// Long-lived credential exchanged once for a new pair
    Refresh,
}

impl TokenType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenType::Access => "access",
            TokenType::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal email)
    pub sub: String,

    /// Access or refresh
    pub token_type: TokenType,

    /// Role names, carried by access tokens only
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// JWT ID, keeps tokens issued within the same second distinct
    pub jti: String,
}

impl Claims {
    /// Creates claims issued now and expiring after `ttl_seconds`
    pub fn new(
        subject: impl Into<String>,
        token_type: TokenType,
        roles: Vec<String>,
        issuer: impl Into<String>,
        ttl_seconds: i64,
    ) -> Result<Self, TokenError> {
        Self::issued_at(Utc::now(), subject, token_type, roles, issuer, ttl_seconds)
    }

    /// Creates claims with an explicit issue time.
    ///
    /// Fails with `GenerationFailed` when the expiry is not a representable instant.
    pub fn issued_at(
        now: DateTime<Utc>,
        subject: impl Into<String>,
        token_type: TokenType,
        roles: Vec<String>,
        issuer: impl Into<String>,
        ttl_seconds: i64,
    ) -> Result<Self, TokenError> {
        let roles = match token_type {
            TokenType::Access => roles,
            TokenType::Refresh => Vec::new(),
        };
        let expiry = Duration::try_seconds(ttl_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or(TokenError::GenerationFailed)?;

        Ok(Self {
            sub: subject.into(),
            token_type,
            roles,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            iss: issuer.into(),
            jti: Uuid::new_v4().to_string(),
        })
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// A token is expired from its `exp` second onwards
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Expiry as a timestamp
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(self.exp, 0).unwrap_or_else(Utc::now)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// Refresh token record stored by the refresh store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshRecord {
    /// The refresh token value as issued
    pub token: String,

    /// Owning principal
    pub principal_id: Uuid,

    /// When the token stops being consumable
    pub expires_at: DateTime<Utc>,

    /// When the record was created
    pub created_at: DateTime<Utc>,
}

impl RefreshRecord {
    pub fn new(token: impl Into<String>, principal_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            principal_id,
            expires_at,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// A signed token together with its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

/// Token pair returned after login or rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Access token expiry
    pub access_expires_at: DateTime<Utc>,

    /// Refresh token expiry
    pub refresh_expires_at: DateTime<Utc>,
}

impl TokenPair {
    pub fn new(access: IssuedToken, refresh: IssuedToken) -> Self {
        Self {
            access_token: access.value,
            refresh_token: refresh.value,
            access_expires_at: access.expires_at,
            refresh_expires_at: refresh.expires_at,
        }
    }

    /// Seconds until the access token expires
    pub fn access_expires_in(&self) -> i64 {
        (self.access_expires_at - Utc::now()).num_seconds().max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_claims_carry_roles() {
        let claims = Claims::new(
            "alice@example.com",
            TokenType::Access,
            vec!["ADMIN".to_string()],
            "tasktrack-auth",
            900,
        )
        .unwrap();

        assert_eq!(claims.sub, "alice@example.com");
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(claims.has_role("ADMIN"));
        assert_eq!(claims.exp - claims.iat, 900);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_refresh_claims_drop_roles() {
        let claims = Claims::new(
            "alice@example.com",
            TokenType::Refresh,
            vec!["ADMIN".to_string()],
            "tasktrack-auth",
            3600,
        )
        .unwrap();

        assert!(claims.roles.is_empty());
        let json = serde_json::to_value(&claims).unwrap();
        assert_eq!(json["token_type"], "refresh");
        assert!(json.get("roles").is_none());
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let claims = Claims::new("bob@example.com", TokenType::Access, vec![], "tasktrack-auth", 0).unwrap();
        assert!(claims.is_expired());
    }

    #[test]
    fn test_claims_issued_together_are_distinct() {
        let now = Utc::now();
        let a = Claims::issued_at(now, "bob@example.com", TokenType::Access, vec![], "iss", 60).unwrap();
        let b = Claims::issued_at(now, "bob@example.com", TokenType::Access, vec![], "iss", 60).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_expires_at_matches_exp() {
        let claims = Claims::new("bob@example.com", TokenType::Refresh, vec![], "iss", 120).unwrap();
        assert_eq!(claims.expires_at().timestamp(), claims.exp);
    }

    #[test]
    fn test_unrepresentable_expiry_fails_generation() {
        let result = Claims::new("bob@example.com", TokenType::Access, vec![], "iss", i64::MAX);
        assert_eq!(result, Err(TokenError::GenerationFailed));

        let result = Claims::new("bob@example.com", TokenType::Refresh, vec![], "iss", 2_000_000_000_000_000);
        assert_eq!(result, Err(TokenError::GenerationFailed));
    }
}
