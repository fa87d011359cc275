//! Business services containing the token lifecycle logic.

pub mod auth;
pub mod authority;
pub mod token;

pub use auth::AuthService;
pub use authority::{LocalTokenAuthority, TokenAuthority};
pub use token::{
    CleanupResult, TokenCleanupConfig, TokenCleanupService, TokenFactory, TokenServiceConfig,
    TokenSigner, TokenValidator,
};
