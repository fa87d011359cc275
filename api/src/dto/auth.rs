use serde::{Deserialize, Serialize};
use validator::Validate;

use tt_core::domain::entities::TokenPair;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Optional body of `POST /auth/refresh_token`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshTokenRequest {
    /// Access token active at rotation time; revoked when it belongs to the same subject
    #[serde(default, alias = "access_token")]
    pub access_token: Option<String>,
}

/// Token pair body returned by login and rotation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPairResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Seconds until the access token expires
    pub expires_in: i64,
    pub token_type: String,
}

impl From<TokenPair> for TokenPairResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            expires_in: pair.access_expires_in(),
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            token_type: String::from("Bearer"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidateTokenRequest {
    pub token: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ValidateTokenResponse {
    pub valid: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutResponse {
    pub message: String,
}

/// The authenticated caller as seen by `GET /auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub subject: String,
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_requires_email() {
        let request = LoginRequest {
            email: "not-an-email".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_err());

        let request = LoginRequest {
            email: "alice@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_token_pair_response_is_camel_case() {
        let response = TokenPairResponse {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 900,
            token_type: "Bearer".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
        assert_eq!(json["expiresIn"], 900);
    }

    #[test]
    fn test_refresh_body_fields_are_optional() {
        let request: RefreshTokenRequest = serde_json::from_str("{}").unwrap();
        assert!(request.access_token.is_none());
    }

    #[test]
    fn test_refresh_body_accepts_both_spellings() {
        let request: RefreshTokenRequest = serde_json::from_str(r#"{"accessToken":"a.b.c"}"#).unwrap();
        assert_eq!(request.access_token.as_deref(), Some("a.b.c"));

        let request: RefreshTokenRequest = serde_json::from_str(r#"{"access_token":"a.b.c"}"#).unwrap();
        assert_eq!(request.access_token.as_deref(), Some("a.b.c"));

        let json = serde_json::to_value(RefreshTokenRequest { access_token: Some("x".into()) }).unwrap();
        assert_eq!(json["accessToken"], "x");
    }
}
