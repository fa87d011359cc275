//! Startup configuration of the edge gateway

use std::time::Duration;

use tt_shared::config::{ConfigError, DelegationConfig, Environment, LoggingConfig, ServerConfig};

/// Port used when `GATEWAY_PORT` is not set
pub const DEFAULT_PORT: u16 = 8080;

/// Upper bound on one forwarded request when `UPSTREAM_TIMEOUT_SECS` is not set
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub delegation: DelegationConfig,
    pub upstream_timeout: Duration,
    pub environment: Environment,
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        let upstream_timeout_secs = match std::env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                key: "UPSTREAM_TIMEOUT_SECS",
                reason: e.to_string(),
            })?,
            Err(_) => DEFAULT_UPSTREAM_TIMEOUT_SECS,
        };

        Ok(Self {
            server: ServerConfig::from_env("GATEWAY_PORT", DEFAULT_PORT)?,
            delegation: DelegationConfig::from_env()?,
            upstream_timeout: Duration::from_secs(upstream_timeout_secs),
            environment,
            logging: LoggingConfig::from_env(environment),
        })
    }
}
