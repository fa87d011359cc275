//! # Infrastructure Layer
//!
//! Concrete implementations of the token core's store traits and the remote
//! token authority.
//!
//! - **Database**: MySQL refresh store and blacklist using SQLx
//! - **Cache**: Redis blacklist with per-entry expiry
//! - **Authority**: HTTP delegation client for components without the secret
//!
//! ## Features
//!
//! - `mysql`: Enable MySQL database support (default)
//! - `redis-cache`: Enable Redis caching support (default)

use tt_core::errors::DomainError;

/// Database module - MySQL implementations using SQLx
#[cfg(feature = "mysql")]
pub mod database;

/// Cache module - Redis client and blacklist store
#[cfg(feature = "redis-cache")]
pub mod cache;

/// Remote token authority
pub mod authority;

/// HTTP client construction
pub mod http;

#[cfg(any(feature = "mysql", feature = "redis-cache"))]
mod digest;

#[cfg(any(feature = "mysql", feature = "redis-cache"))]
pub use digest::hash_token;

pub use authority::RemoteTokenAuthority;
pub use http::{build_http_client, HttpConfig};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[cfg(feature = "mysql")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Redis cache error
    #[cfg(feature = "redis-cache")]
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// HTTP request error for the token authority
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Config(message) => DomainError::Config { message },
            other => DomainError::Storage {
                message: other.to_string(),
            },
        }
    }
}
