//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and token-store schema
//! - Refresh store with row-locked single-use consumption
//! - Blacklist store

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{MySqlBlacklistStore, MySqlRefreshTokenStore};

use tt_core::errors::DomainError;

use crate::InfrastructureError;

pub(crate) fn storage_error(err: sqlx::Error) -> DomainError {
    tracing::error!("Token store query failed: {}", err);
    InfrastructureError::Database(err).into()
}
