//! Shared configuration and response types for the TaskTrack token services
//!
//! - Configuration types loaded from the environment
//! - The JSON error body shared by the HTTP surfaces
//! - Tracing subscriber setup for the binaries

pub mod config;
pub mod errors;
pub mod telemetry;

// Re-export commonly used items at crate root
pub use config::{
    CacheConfig, ConfigError, DatabaseConfig, DelegationConfig, Environment, JwtConfig,
    LogFormat, LoggingConfig, ServerConfig, StorageConfig, StoreBackend,
};
pub use errors::{error_codes, ErrorResponse};
