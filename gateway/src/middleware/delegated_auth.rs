//! Bearer check for components that do not hold the signing secret.
//!
//! Public paths pass straight through. Everything else needs an
//! `Authorization: Bearer` header whose token the authority confirms; a
//! negative answer or an authority that cannot be reached rejects the
//! request with 401. Accepted requests continue unmodified.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::{HeaderMap, AUTHORIZATION},
    Error, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::{debug, error, warn};

use tt_core::services::TokenAuthority;
use tt_shared::{DelegationConfig, ErrorResponse};

/// Delegated authentication middleware factory
#[derive(Clone)]
pub struct DelegatedAuth {
    authority: Arc<dyn TokenAuthority>,
    config: Arc<DelegationConfig>,
}

impl DelegatedAuth {
    pub fn new(authority: Arc<dyn TokenAuthority>, config: Arc<DelegationConfig>) -> Self {
        Self { authority, config }
    }
}

impl<S, B> Transform<S, ServiceRequest> for DelegatedAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = DelegatedAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(DelegatedAuthMiddleware {
            service: Rc::new(service),
            authority: self.authority.clone(),
            config: self.config.clone(),
        }))
    }
}

pub struct DelegatedAuthMiddleware<S> {
    service: Rc<S>,
    authority: Arc<dyn TokenAuthority>,
    config: Arc<DelegationConfig>,
}

impl<S, B> Service<ServiceRequest> for DelegatedAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        if self.config.is_public(req.path()) {
            return Box::pin(async move { service.call(req).await });
        }

        let authority = self.authority.clone();

        Box::pin(async move {
            let token = match extract_bearer_token(req.headers()) {
                Some(token) => token.to_string(),
                None => {
                    debug!(path = %req.path(), "Missing bearer token");
                    return Err(unauthorized("missing bearer token"));
                }
            };

            match authority.validate_access(&token).await {
                Ok(true) => service.call(req).await,
                Ok(false) => {
                    warn!(path = %req.path(), "Authority rejected bearer token");
                    Err(unauthorized("token rejected by authority"))
                }
                Err(e) => {
                    error!(error = %e, path = %req.path(), "Token authority unavailable");
                    Err(unauthorized("token authority unavailable"))
                }
            }
        })
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn unauthorized(cause: &'static str) -> Error {
    InternalError::from_response(cause, HttpResponse::Unauthorized().json(ErrorResponse::unauthorized())).into()
}
