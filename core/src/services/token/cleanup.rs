//! Token cleanup service for periodic maintenance of refresh records and
//! blacklist entries

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::repositories::{BlacklistStore, RefreshTokenStore};

/// Configuration for token cleanup service
#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    /// Whether to enable automatic cleanup
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

impl TokenCleanupConfig {
    /// Read `TOKEN_CLEANUP_INTERVAL_SECS` and `TOKEN_CLEANUP_ENABLED`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            interval_seconds: std::env::var("TOKEN_CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.interval_seconds),
            enabled: std::env::var("TOKEN_CLEANUP_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enabled),
        }
    }
}

/// Service for purging expired refresh records and blacklist entries
pub struct TokenCleanupService {
    refresh_tokens: Arc<dyn RefreshTokenStore>,
    blacklist: Arc<dyn BlacklistStore>,
    config: TokenCleanupConfig,
}

impl TokenCleanupService {
    pub fn new(
        refresh_tokens: Arc<dyn RefreshTokenStore>,
        blacklist: Arc<dyn BlacklistStore>,
        config: TokenCleanupConfig,
    ) -> Self {
        Self {
            refresh_tokens,
            blacklist,
            config,
        }
    }

    /// Run a single cleanup cycle.
    ///
    /// A failure on one store is recorded and does not stop the other.
    pub async fn run_cleanup(&self) -> CleanupResult {
        let mut result = CleanupResult::default();

        match self.refresh_tokens.purge_expired().await {
            Ok(count) => result.expired_refresh_tokens_deleted = count,
            Err(e) => {
                error!("Failed to purge expired refresh tokens: {}", e);
                result.errors.push(format!("Refresh token cleanup error: {}", e));
            }
        }

        match self.blacklist.purge_expired().await {
            Ok(count) => result.blacklist_entries_deleted = count,
            Err(e) => {
                error!("Failed to purge blacklist: {}", e);
                result.errors.push(format!("Blacklist cleanup error: {}", e));
            }
        }

        info!(
            "Token cleanup completed - Refresh: {}, Blacklist: {}",
            result.expired_refresh_tokens_deleted, result.blacklist_entries_deleted
        );

        result
    }

    /// Start the cleanup service as a background task
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Token cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Token cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                let result = self.run_cleanup().await;
                if !result.is_success() {
                    warn!("Cleanup completed with errors: {:?}", result.errors);
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    /// Number of expired refresh records deleted
    pub expired_refresh_tokens_deleted: usize,
    /// Number of blacklist entries past their token's expiry deleted
    pub blacklist_entries_deleted: usize,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn total_cleaned(&self) -> usize {
        self.expired_refresh_tokens_deleted + self.blacklist_entries_deleted
    }
}
