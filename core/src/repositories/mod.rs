//! Store interfaces for refresh tokens, the blacklist and principals,
//! with in-memory implementations.

pub mod blacklist;
pub mod principal;
pub mod refresh;

pub use blacklist::{BlacklistStore, InMemoryBlacklistStore};
pub use principal::{InMemoryPrincipalDirectory, PrincipalDirectory, DEFAULT_HASH_COST};
pub use refresh::{InMemoryRefreshTokenStore, RefreshTokenStore};
