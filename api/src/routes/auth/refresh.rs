use actix_web::{web, HttpRequest, HttpResponse};

use tt_core::errors::{AuthError, DomainError};

use crate::dto::auth::{RefreshTokenRequest, TokenPairResponse};
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::extract_bearer_token;

use super::AppState;

/// Handler for POST /auth/refresh_token
///
/// Exchanges the refresh token in the Authorization header, once, for a new
/// pair. An optional body names the access token active at rotation time so
/// it can be revoked along with the old refresh token.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {refresh_token}
/// ```
///
/// # Request Body (optional)
///
/// ```json
/// { "access_token": "eyJ..." }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing header, invalid, expired or already used refresh token
/// - 403 Forbidden: The token's principal no longer exists
pub async fn refresh_token(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> HttpResponse {
    let old_refresh_token = match extract_bearer_token(req.headers()) {
        Some(token) => token,
        None => return handle_domain_error(&DomainError::Auth(AuthError::MissingBearer)),
    };

    let presented_access_token = body.and_then(|b| b.into_inner().access_token);

    match state
        .auth_service
        .rotate(old_refresh_token, presented_access_token.as_deref())
        .await
    {
        Ok(pair) => HttpResponse::Ok().json(TokenPairResponse::from(pair)),
        Err(error) => handle_domain_error(&error),
    }
}
