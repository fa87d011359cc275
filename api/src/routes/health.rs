use actix_web::{web, HttpResponse};
use serde::Serialize;
use tracing::warn;

use tt_infra::cache::RedisClient;
use tt_infra::database::DatabasePool;

use crate::routes::auth::AppState;

/// Token-store backends the service was started with.
///
/// Only configured backends are checked; an in-memory deployment always
/// reports healthy.
#[derive(Clone, Default)]
pub struct Backends {
    pub database: Option<DatabasePool>,
    pub cache: Option<RedisClient>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendStatus {
    Up,
    Down,
}

impl BackendStatus {
    fn from_check<E: std::fmt::Display>(backend: &'static str, result: Result<bool, E>) -> Self {
        match result {
            Ok(true) => BackendStatus::Up,
            Ok(false) => {
                warn!(backend, "Health check returned an unexpected answer");
                BackendStatus::Down
            }
            Err(e) => {
                warn!(backend, error = %e, "Health check failed");
                BackendStatus::Down
            }
        }
    }
}

#[derive(Debug, Default, Serialize)]
pub struct BackendChecks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mysql: Option<BackendStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<BackendStatus>,
}

impl BackendChecks {
    pub fn is_healthy(&self) -> bool {
        [self.mysql, self.redis]
            .iter()
            .flatten()
            .all(|status| *status == BackendStatus::Up)
    }
}

impl Backends {
    pub async fn check(&self) -> BackendChecks {
        let mut checks = BackendChecks::default();
        if let Some(pool) = &self.database {
            checks.mysql = Some(BackendStatus::from_check("mysql", pool.health_check().await));
        }
        if let Some(client) = &self.cache {
            checks.redis = Some(BackendStatus::from_check("redis", client.health_check().await));
        }
        checks
    }
}

/// Handler for GET /health
///
/// Answers 503 with `degraded` while a configured store is unreachable.
pub async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let checks = state.backends.check().await;
    let (mut response, status) = if checks.is_healthy() {
        (HttpResponse::Ok(), "healthy")
    } else {
        (HttpResponse::ServiceUnavailable(), "degraded")
    };

    response.json(serde_json::json!({
        "status": status,
        "service": "tasktrack-auth",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "checks": checks,
    }))
}
