//! Backend selection for the refresh and blacklist stores

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Where a token store keeps its state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// Process-local map; single instance only
    Memory,
    /// MySQL tables shared by every instance
    Mysql,
    /// Redis keys with per-entry expiry (blacklist only)
    Redis,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "in-memory" => Ok(StoreBackend::Memory),
            "mysql" => Ok(StoreBackend::Mysql),
            "redis" => Ok(StoreBackend::Redis),
            _ => Err(format!("Invalid store backend: {}", s)),
        }
    }
}

/// Backends for the two token stores
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Refresh Store backend
    pub refresh_tokens: StoreBackend,
    /// Blacklist Store backend
    pub blacklist: StoreBackend,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            refresh_tokens: StoreBackend::Memory,
            blacklist: StoreBackend::Memory,
        }
    }
}

impl StorageConfig {
    /// Read `TOKEN_STORE` and `BLACKLIST_STORE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let refresh_tokens = match lookup("TOKEN_STORE") {
            Some(raw) => parse_backend("TOKEN_STORE", &raw)?,
            None => StoreBackend::Memory,
        };
        if refresh_tokens == StoreBackend::Redis {
            return Err(ConfigError::Invalid {
                key: "TOKEN_STORE",
                reason: "the refresh store supports memory or mysql".to_string(),
            });
        }
        let blacklist = match lookup("BLACKLIST_STORE") {
            Some(raw) => parse_backend("BLACKLIST_STORE", &raw)?,
            None => refresh_tokens,
        };

        Ok(Self { refresh_tokens, blacklist })
    }

    /// Whether any store needs a MySQL pool
    pub fn needs_database(&self) -> bool {
        self.refresh_tokens == StoreBackend::Mysql || self.blacklist == StoreBackend::Mysql
    }

    /// Whether any store needs a Redis connection
    pub fn needs_redis(&self) -> bool {
        self.blacklist == StoreBackend::Redis
    }
}

fn parse_backend(key: &'static str, raw: &str) -> Result<StoreBackend, ConfigError> {
    raw.parse().map_err(|reason| ConfigError::Invalid { key, reason })
}
