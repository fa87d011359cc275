use actix_web::{web, HttpResponse};
use tracing::debug;
use validator::Validate;

use crate::dto::auth::{LoginRequest, TokenPairResponse};
use crate::handlers::error::{handle_domain_error, handle_validation_error};

use super::AppState;

/// Handler for POST /auth/login
///
/// # Request Body
///
/// ```json
/// { "email": "alice@example.com", "password": "..." }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// { "accessToken": "eyJ...", "refreshToken": "eyJ...", "expiresIn": 900, "tokenType": "Bearer" }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Malformed email
/// - 401 Unauthorized: Unknown email or wrong password
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> HttpResponse {
    if let Err(errors) = request.validate() {
        return handle_validation_error(&errors);
    }

    match state.auth_service.login(&request.email, &request.password).await {
        Ok(pair) => {
            debug!("Login succeeded");
            HttpResponse::Ok().json(TokenPairResponse::from(pair))
        }
        Err(error) => handle_domain_error(&error),
    }
}
