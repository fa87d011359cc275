use actix_web::{error::InternalError, web, HttpRequest, HttpResponse};
use tracing::debug;

use crate::dto::auth::{ValidateTokenRequest, ValidateTokenResponse};

use super::AppState;

/// Handler for POST /auth/validate-token
///
/// Answers only with a boolean; the reason for a rejection is logged and
/// never returned.
///
/// # Request Body
///
/// ```json
/// { "token": "eyJ..." }
/// ```
///
/// # Response
///
/// Always 200 OK:
/// ```json
/// { "valid": true }
/// ```
pub async fn validate_token(
    state: web::Data<AppState>,
    request: web::Json<ValidateTokenRequest>,
) -> HttpResponse {
    let valid = state.auth_service.validate_token(&request.token).await;
    HttpResponse::Ok().json(ValidateTokenResponse { valid })
}

/// Body parsing for the validation endpoint: a payload that cannot be read
/// is an invalid token, not a client error
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(16 * 1024)
        .error_handler(|err, _req: &HttpRequest| {
            debug!(error = %err, "Unreadable validation request");
            InternalError::from_response(
                err,
                HttpResponse::Ok().json(ValidateTokenResponse { valid: false }),
            )
            .into()
        })
}
