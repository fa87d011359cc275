use actix_web::{web, HttpRequest, HttpResponse};

use tt_core::errors::{AuthError, DomainError};

use crate::dto::auth::LogoutResponse;
use crate::handlers::error::handle_domain_error;
use crate::middleware::auth::extract_bearer_token;

use super::AppState;

/// Handler for POST /auth/logout
///
/// Blacklists the presented access token until its expiry and deletes the
/// principal's refresh tokens. A token that cannot be verified is accepted
/// and ignored.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "message": "Logged out successfully" }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Missing or malformed Authorization header
/// - 500 Internal Server Error: Store failure
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let access_token = match extract_bearer_token(req.headers()) {
        Some(token) => token,
        None => return handle_domain_error(&DomainError::Auth(AuthError::MissingBearer)),
    };

    match state.auth_service.logout(access_token).await {
        Ok(()) => HttpResponse::Ok().json(LogoutResponse {
            message: "Logged out successfully".to_string(),
        }),
        Err(error) => handle_domain_error(&error),
    }
}
