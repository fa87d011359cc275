use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::info;

use tt_core::services::TokenAuthority;
use tt_gateway::app::create_app;
use tt_gateway::config::GatewayConfig;
use tt_gateway::proxy::UpstreamProxy;
use tt_infra::{build_http_client, HttpConfig, RemoteTokenAuthority};
use tt_shared::telemetry;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = GatewayConfig::from_env().context("invalid configuration")?;
    telemetry::init_tracing(&config.logging);

    let remote = RemoteTokenAuthority::from_config(&config.delegation)
        .context("failed to build the token authority client")?;
    info!(
        authority = %remote.endpoint(),
        upstream = %config.delegation.upstream_url,
        timeout_ms = config.delegation.timeout_ms,
        "Starting TaskTrack gateway"
    );
    let authority: Arc<dyn TokenAuthority> = Arc::new(remote);

    let upstream_client = build_http_client(&HttpConfig::default().with_timeout(config.upstream_timeout))
        .context("failed to build the upstream client")?;
    let proxy = web::Data::new(UpstreamProxy::new(upstream_client, config.delegation.upstream_url.clone()));
    let delegation = Arc::new(config.delegation.clone());

    let bind_address = config.server.bind_address();
    info!("Gateway will bind to: {}", bind_address);

    let mut server = HttpServer::new(move || {
        create_app(authority.clone(), delegation.clone(), proxy.clone())
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
