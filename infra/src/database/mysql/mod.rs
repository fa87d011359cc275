//! MySQL token stores

mod blacklist_store;
mod refresh_token_store;

pub use blacklist_store::MySqlBlacklistStore;
pub use refresh_token_store::MySqlRefreshTokenStore;
