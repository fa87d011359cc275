//! Edge gateway configuration: where to delegate validation and where to forward

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Delegated validation settings used by components that do not hold the secret
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DelegationConfig {
    /// Base URL of the token-owning service, e.g. `http://localhost:8081`
    pub authority_url: String,

    /// Upper bound on one validation round trip, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Path prefixes forwarded without a token check
    #[serde(default = "default_public_paths")]
    pub public_paths: Vec<String>,

    /// Base URL accepted requests are forwarded to
    pub upstream_url: String,
}

impl DelegationConfig {
    /// Read `AUTHORITY_URL`, `UPSTREAM_URL`, `DELEGATION_TIMEOUT_MS`, `GATEWAY_PUBLIC_PATHS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let authority_url = lookup("AUTHORITY_URL").ok_or(ConfigError::Missing("AUTHORITY_URL"))?;
        let upstream_url = lookup("UPSTREAM_URL").ok_or(ConfigError::Missing("UPSTREAM_URL"))?;
        let timeout_ms = match lookup("DELEGATION_TIMEOUT_MS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "DELEGATION_TIMEOUT_MS",
                reason: e.to_string(),
            })?,
            None => default_timeout_ms(),
        };
        if timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                key: "DELEGATION_TIMEOUT_MS",
                reason: "must be positive".to_string(),
            });
        }
        let public_paths = match lookup("GATEWAY_PUBLIC_PATHS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect(),
            None => default_public_paths(),
        };

        Ok(Self {
            authority_url: authority_url.trim_end_matches('/').to_string(),
            timeout_ms,
            public_paths,
            upstream_url: upstream_url.trim_end_matches('/').to_string(),
        })
    }

    /// Whether the path bypasses validation
    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.iter().any(|prefix| path.starts_with(prefix.as_str()))
    }
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_public_paths() -> Vec<String> {
    vec![String::from("/auth/")]
}
