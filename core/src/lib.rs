//! # TaskTrack Core
//!
//! Token lifecycle for the TaskTrack services: claims, signing, issuance,
//! local validation, single-use refresh rotation, blacklist revocation and
//! the token authority capability shared by every validating component.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
