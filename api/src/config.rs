//! Startup configuration of the authentication service

use tt_core::services::TokenCleanupConfig;
use tt_shared::config::{
    CacheConfig, ConfigError, DatabaseConfig, Environment, JwtConfig, LoggingConfig, ServerConfig,
    StorageConfig,
};

/// Port used when `SERVER_PORT` is not set
pub const DEFAULT_PORT: u16 = 8081;

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt: JwtConfig,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub database: DatabaseConfig,
    pub cache: CacheConfig,
    pub cleanup: TokenCleanupConfig,
    pub environment: Environment,
    pub logging: LoggingConfig,
    /// `email:password:ROLE1|ROLE2` entries separated by `;`
    pub principals_seed: Option<String>,
}

impl Config {
    /// Read every setting from the environment; any invalid value aborts startup
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        Ok(Config {
            jwt: JwtConfig::from_env()?,
            server: ServerConfig::from_env("SERVER_PORT", DEFAULT_PORT)?,
            storage: StorageConfig::from_env()?,
            database: DatabaseConfig::from_env(),
            cache: CacheConfig::from_env(),
            cleanup: TokenCleanupConfig::from_env(),
            environment,
            logging: LoggingConfig::from_env(environment),
            principals_seed: std::env::var("PRINCIPALS_SEED").ok().filter(|s| !s.trim().is_empty()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}
