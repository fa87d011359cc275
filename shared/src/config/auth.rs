//! Token signing and lifetime configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Minimum accepted length of the HMAC signing secret, in bytes
pub const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted token lifetime, ten years in seconds
pub const MAX_TOKEN_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

/// Issuer written into every token when `JWT_ISSUER` is not set
pub const DEFAULT_ISSUER: &str = "tasktrack-auth";

/// JWT signing configuration shared by every component that validates locally
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Shared HMAC secret
    pub secret: String,

    /// Access token lifetime in seconds
    pub access_token_expiry: i64,

    /// Refresh token lifetime in seconds
    pub refresh_token_expiry: i64,

    /// Issuer claim written into and required on every token
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

// The secret never appears in logs.
impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("access_token_expiry", &self.access_token_expiry)
            .field("refresh_token_expiry", &self.refresh_token_expiry)
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtConfig {
    /// Create a configuration with the given secret and lifetimes (seconds)
    pub fn new(secret: impl Into<String>, access_token_expiry: i64, refresh_token_expiry: i64) -> Self {
        Self {
            secret: secret.into(),
            access_token_expiry,
            refresh_token_expiry,
            issuer: default_issuer(),
        }
    }

    /// Override the issuer claim
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Load from environment variables.
    ///
    /// `JWT_SECRET`, `JWT_ACCESS_TOKEN_EXPIRY` and `JWT_REFRESH_TOKEN_EXPIRY`
    /// are required; a missing or invalid value is a fatal startup error.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let access_token_expiry = parse_seconds(&lookup, "JWT_ACCESS_TOKEN_EXPIRY")?;
        let refresh_token_expiry = parse_seconds(&lookup, "JWT_REFRESH_TOKEN_EXPIRY")?;
        let issuer = lookup("JWT_ISSUER").unwrap_or_else(default_issuer);

        let config = Self {
            secret,
            access_token_expiry,
            refresh_token_expiry,
            issuer,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check the secret length, lifetime bounds and ordering
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.len() < MIN_SECRET_LENGTH {
            return Err(ConfigError::Invalid {
                key: "JWT_SECRET",
                reason: format!("must be at least {} bytes", MIN_SECRET_LENGTH),
            });
        }
        if self.access_token_expiry <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_ACCESS_TOKEN_EXPIRY",
                reason: "must be positive".to_string(),
            });
        }
        if self.refresh_token_expiry > MAX_TOKEN_TTL_SECS {
            return Err(ConfigError::Invalid {
                key: "JWT_REFRESH_TOKEN_EXPIRY",
                reason: format!("must not exceed {} seconds", MAX_TOKEN_TTL_SECS),
            });
        }
        if self.refresh_token_expiry <= self.access_token_expiry {
            return Err(ConfigError::Invalid {
                key: "JWT_REFRESH_TOKEN_EXPIRY",
                reason: "must exceed the access token expiry".to_string(),
            });
        }
        if self.issuer.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "JWT_ISSUER",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_seconds<F>(lookup: &F, key: &'static str) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key).ok_or(ConfigError::Missing(key))?;
    raw.trim().parse::<i64>().map_err(|e| ConfigError::Invalid {
        key,
        reason: e.to_string(),
    })
}

fn default_issuer() -> String {
    String::from(DEFAULT_ISSUER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_loads_required_values() {
        let config = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("JWT_ACCESS_TOKEN_EXPIRY", "900"),
            ("JWT_REFRESH_TOKEN_EXPIRY", "604800"),
        ]))
        .unwrap();

        assert_eq!(config.access_token_expiry, 900);
        assert_eq!(config.refresh_token_expiry, 604800);
        assert_eq!(config.issuer, DEFAULT_ISSUER);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        let err = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_ACCESS_TOKEN_EXPIRY", "900"),
            ("JWT_REFRESH_TOKEN_EXPIRY", "604800"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Missing("JWT_SECRET")));
    }

    #[test]
    fn test_short_secret_is_rejected() {
        let err = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", "short"),
            ("JWT_ACCESS_TOKEN_EXPIRY", "900"),
            ("JWT_REFRESH_TOKEN_EXPIRY", "604800"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "JWT_SECRET", .. }));
    }

    #[test]
    fn test_non_numeric_expiry_is_rejected() {
        let err = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("JWT_ACCESS_TOKEN_EXPIRY", "fifteen"),
            ("JWT_REFRESH_TOKEN_EXPIRY", "604800"),
        ]))
        .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid { key: "JWT_ACCESS_TOKEN_EXPIRY", .. }));
    }

    #[test]
    fn test_refresh_must_outlive_access() {
        let config = JwtConfig::new(SECRET, 3600, 60);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "JWT_REFRESH_TOKEN_EXPIRY", .. })
        ));
    }

    #[test]
    fn test_unbounded_lifetimes_are_rejected() {
        let config = JwtConfig::new(SECRET, 1_000_000_000_000_000, 2_000_000_000_000_000);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { key: "JWT_REFRESH_TOKEN_EXPIRY", .. })
        ));

        let err = JwtConfig::from_lookup(lookup_from(&[
            ("JWT_SECRET", SECRET),
            ("JWT_ACCESS_TOKEN_EXPIRY", "900"),
            ("JWT_REFRESH_TOKEN_EXPIRY", &i64::MAX.to_string()),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "JWT_REFRESH_TOKEN_EXPIRY", .. }));

        assert!(JwtConfig::new(SECRET, 900, MAX_TOKEN_TTL_SECS).validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = JwtConfig::new(SECRET, 900, 604800);
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains(SECRET));
        assert!(rendered.contains("<redacted>"));
    }
}
