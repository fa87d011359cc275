//! Token service module for JWT management
//!
//! - HS256 signing and verification under a shared secret
//! - Access and refresh token issuance
//! - Local validation against the blacklist and refresh store
//! - Background cleanup of expired records

mod cleanup;
mod config;
mod factory;
mod signer;
mod validator;


pub use cleanup::{CleanupResult, TokenCleanupConfig, TokenCleanupService};
pub use config::TokenServiceConfig;
pub use factory::TokenFactory;
pub use signer::TokenSigner;
pub use validator::{check_claims, TokenValidator};
