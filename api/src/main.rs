use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};

use tt_api::app::create_app;
use tt_api::config::Config;
use tt_api::routes::auth::AppState;
use tt_api::routes::health::Backends;
use tt_core::repositories::{
    BlacklistStore, InMemoryBlacklistStore, InMemoryPrincipalDirectory, InMemoryRefreshTokenStore,
    PrincipalDirectory, RefreshTokenStore, DEFAULT_HASH_COST,
};
use tt_core::services::{AuthService, TokenCleanupService, TokenServiceConfig};
use tt_infra::cache::{RedisBlacklistStore, RedisClient};
use tt_infra::database::{DatabasePool, MySqlBlacklistStore, MySqlRefreshTokenStore};
use tt_shared::{telemetry, StoreBackend};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("invalid configuration")?;
    telemetry::init_tracing(&config.logging);

    info!(environment = %config.environment, "Starting TaskTrack auth service");

    let (refresh_tokens, blacklist, backends) = build_stores(&config).await?;
    let database = backends.database.clone();
    let principals = build_principals(&config).await?;

    let token_config = TokenServiceConfig::from(&config.jwt);
    let auth_service = Arc::new(AuthService::new(
        &token_config,
        refresh_tokens.clone(),
        blacklist.clone(),
        principals,
    ));

    let cleanup = Arc::new(TokenCleanupService::new(
        refresh_tokens,
        blacklist,
        config.cleanup.clone(),
    ));
    let _cleanup_task = cleanup.start_background_task();

    let app_state = web::Data::new(AppState::new(auth_service).with_backends(backends));
    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || create_app(app_state.clone()));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    if let Some(pool) = database {
        pool.close().await;
    }

    Ok(())
}

async fn build_stores(
    config: &Config,
) -> anyhow::Result<(Arc<dyn RefreshTokenStore>, Arc<dyn BlacklistStore>, Backends)> {
    let database = if config.storage.needs_database() {
        let pool = DatabasePool::new(config.database.clone())
            .await
            .context("failed to connect to MySQL")?;
        pool.ensure_schema().await.context("failed to create token tables")?;
        Some(pool)
    } else {
        None
    };

    let cache = if config.storage.needs_redis() {
        let client = RedisClient::new(config.cache.clone())
            .await
            .context("failed to connect to Redis")?;
        Some(client)
    } else {
        None
    };

    let refresh_tokens: Arc<dyn RefreshTokenStore> = match (config.storage.refresh_tokens, &database) {
        (StoreBackend::Mysql, Some(pool)) => Arc::new(MySqlRefreshTokenStore::new(pool.get_pool().clone())),
        _ => Arc::new(InMemoryRefreshTokenStore::new()),
    };

    let blacklist: Arc<dyn BlacklistStore> = match (config.storage.blacklist, &database) {
        (StoreBackend::Mysql, Some(pool)) => Arc::new(MySqlBlacklistStore::new(pool.get_pool().clone())),
        (StoreBackend::Redis, _) => match &cache {
            Some(client) => Arc::new(RedisBlacklistStore::new(client.clone())),
            None => Arc::new(InMemoryBlacklistStore::new()),
        },
        _ => Arc::new(InMemoryBlacklistStore::new()),
    };

    if config.storage.refresh_tokens == StoreBackend::Memory && config.is_production() {
        warn!("In-memory refresh store in production: rotation state is lost on restart");
    }
    info!(
        refresh_tokens = ?config.storage.refresh_tokens,
        blacklist = ?config.storage.blacklist,
        "Token stores ready"
    );

    Ok((refresh_tokens, blacklist, Backends { database, cache }))
}

async fn build_principals(config: &Config) -> anyhow::Result<Arc<dyn PrincipalDirectory>> {
    let directory = match &config.principals_seed {
        Some(seed) => InMemoryPrincipalDirectory::from_seed(seed, DEFAULT_HASH_COST)
            .await
            .context("invalid PRINCIPALS_SEED")?,
        None => {
            warn!("PRINCIPALS_SEED is empty; every login will be rejected");
            InMemoryPrincipalDirectory::new()
        }
    };

    info!(principals = directory.len().await, "Principal directory loaded");
    Ok(Arc::new(directory))
}
