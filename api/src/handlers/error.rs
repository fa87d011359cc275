//! Mapping of domain failures onto HTTP responses.
//!
//! Token failures never say which check failed: every one of them becomes
//! the same generic 401 body.

use actix_web::HttpResponse;
use tracing::{error, warn};
use validator::ValidationErrors;

use tt_core::errors::{AuthError, DomainError, TokenError};
use tt_shared::{error_codes, ErrorResponse};

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Token(TokenError::PrincipalNotFound) => {
            warn!(reason = %error, "Request rejected");
            HttpResponse::Forbidden().json(ErrorResponse::new(
                error_codes::FORBIDDEN,
                "Access denied",
            ))
        }
        DomainError::Token(_) | DomainError::Auth(AuthError::MissingBearer) => {
            warn!(reason = %error, "Request rejected");
            HttpResponse::Unauthorized().json(ErrorResponse::unauthorized())
        }
        DomainError::Auth(AuthError::InvalidCredentials) => {
            warn!("Login rejected");
            HttpResponse::Unauthorized().json(ErrorResponse::new(
                error_codes::UNAUTHORIZED,
                "Invalid email or password",
            ))
        }
        DomainError::Storage { .. } | DomainError::Config { .. } | DomainError::Internal { .. } => {
            error!(error = %error, "Request failed");
            HttpResponse::InternalServerError().json(ErrorResponse::new(
                error_codes::INTERNAL_ERROR,
                "An internal error occurred",
            ))
        }
    }
}

/// 400 response for a request body that failed validation
pub fn handle_validation_error(errors: &ValidationErrors) -> HttpResponse {
    let fields: Vec<&str> = errors.field_errors().keys().copied().collect();
    HttpResponse::BadRequest().json(ErrorResponse::new(
        error_codes::VALIDATION_ERROR,
        format!("Invalid fields: {}", fields.join(", ")),
    ))
}
