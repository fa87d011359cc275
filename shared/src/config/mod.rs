//! Configuration module with concern-specific sub-modules
//!
//! - `auth` - token signing secret and lifetimes
//! - `cache` - Redis connection for the blacklist backend
//! - `database` - MySQL pool for the token stores
//! - `delegation` - edge gateway delegation and forwarding
//! - `environment` - environment detection and logging
//! - `server` - HTTP bind address
//! - `storage` - store backend selection

pub mod auth;
pub mod cache;
pub mod database;
pub mod delegation;
pub mod environment;
pub mod server;
pub mod storage;

use thiserror::Error;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use cache::CacheConfig;
pub use database::DatabaseConfig;
pub use delegation::DelegationConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;
pub use storage::{StorageConfig, StoreBackend};

/// Startup configuration failure. Always fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    #[error("invalid configuration {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}
