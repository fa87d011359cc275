//! Token and authentication error types.
//!
//! The variants keep the internal failure classification for logs. The
//! presentation layer collapses every token failure into one unauthenticated
//! outcome.

use thiserror::Error;

use crate::domain::entities::TokenType;

/// Token validation, rotation and delegation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token signature verification failed")]
    InvalidSignature,

    #[error("Token expired")]
    Expired,

    #[error("Wrong token type: expected {expected}")]
    WrongTokenType { expected: TokenType },

    #[error("Token subject does not match")]
    SubjectMismatch,

    #[error("Token revoked")]
    Revoked,

    #[error("Refresh token not found or already consumed")]
    Unauthorized,

    #[error("Principal not found")]
    PrincipalNotFound,

    #[error("Token authority unreachable: {reason}")]
    TransportFailure { reason: String },

    #[error("Token generation failed")]
    GenerationFailed,
}

/// Credential and request-shape failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing or malformed bearer token")]
    MissingBearer,
}
