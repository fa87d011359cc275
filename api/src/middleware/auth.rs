//! Bearer token middleware for routes served by the token owner.
//!
//! Extracts the token from the Authorization header, runs the full local
//! validation (signature, type, expiry, subject, blacklist) and injects the
//! caller's [`AuthContext`] into the request.

use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    http::header::{HeaderMap, AUTHORIZATION},
    Error, FromRequest, HttpMessage, HttpRequest, HttpResponse,
};
use futures_util::future::LocalBoxFuture;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::{debug, error, warn};

use tt_core::{
    domain::entities::Claims,
    errors::DomainError,
    services::token::TokenValidator,
};
use tt_shared::{error_codes, ErrorResponse};

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    /// Subject claim (principal email)
    pub subject: String,
    /// Roles carried by the access token
    pub roles: Vec<String>,
    /// JWT ID for tracking
    pub jti: String,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Self {
        Self {
            subject: claims.sub,
            roles: claims.roles,
            jti: claims.jti,
        }
    }

    /// Flat role membership
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// JWT authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    validator: Arc<TokenValidator>,
}

impl JwtAuth {
    pub fn new(validator: Arc<TokenValidator>) -> Self {
        Self { validator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            validator: self.validator.clone(),
        }))
    }
}

/// JWT authentication middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    validator: Arc<TokenValidator>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
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
        let validator = self.validator.clone();

        Box::pin(async move {
            // Reject before any parsing when the header is absent or malformed
            let token = match extract_bearer_token(req.headers()) {
                Some(token) => token.to_string(),
                None => {
                    debug!(path = %req.path(), "Missing bearer token");
                    return Err(unauthorized("missing bearer token"));
                }
            };

            let claims = match validator.authenticate(&token).await {
                Ok(claims) => claims,
                Err(DomainError::Token(e)) => {
                    warn!(reason = %e, path = %req.path(), "Bearer token rejected");
                    return Err(unauthorized("invalid bearer token"));
                }
                Err(e) => {
                    // Store outage: fail closed
                    error!(error = %e, "Bearer validation could not complete");
                    return Err(unauthorized("bearer validation unavailable"));
                }
            };

            req.extensions_mut().insert(AuthContext::from_claims(claims));

            service.call(req).await
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

/// Generic 401 with the shared JSON body; the cause is only logged
fn unauthorized(cause: &'static str) -> Error {
    InternalError::from_response(cause, HttpResponse::Unauthorized().json(ErrorResponse::unauthorized())).into()
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| {
                InternalError::from_response(
                    "authentication required",
                    HttpResponse::Unauthorized().json(ErrorResponse::new(
                        error_codes::UNAUTHORIZED,
                        "Authentication required",
                    )),
                )
                .into()
            });

        ready(result)
    }
}
