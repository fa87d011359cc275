//! Application factory for the gateway

use std::sync::Arc;

use actix_web::{web, App, HttpResponse};
use tracing_actix_web::TracingLogger;

use tt_core::services::TokenAuthority;
use tt_shared::DelegationConfig;

use crate::middleware::DelegatedAuth;
use crate::proxy::{forward, UpstreamProxy};

/// Every request except `/health` goes through the bearer check and is then
/// forwarded upstream
pub fn create_app(
    authority: Arc<dyn TokenAuthority>,
    delegation: Arc<DelegationConfig>,
    proxy: web::Data<UpstreamProxy>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(proxy)
        .app_data(web::PayloadConfig::default().limit(10 * 1024 * 1024))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("")
                .wrap(DelegatedAuth::new(authority, delegation))
                .default_service(web::to(forward)),
        )
}

/// Handler for GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "tasktrack-gateway",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
