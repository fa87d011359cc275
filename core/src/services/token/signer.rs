//! HMAC signing and verification of token claims

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::domain::entities::Claims;
use crate::errors::TokenError;

use super::config::TokenServiceConfig;

/// Signs and verifies HS256 tokens under one shared secret.
///
/// Verification checks encoding, algorithm, signature and issuer only. Expiry
/// and token type are interpreted by the validator.
pub struct TokenSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    header: Header,
    validation: Validation,
    issuer: String,
}

impl TokenSigner {
    pub fn new(secret: &[u8], issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            header: Header::new(Algorithm::HS256),
            validation,
            issuer,
        }
    }

    pub fn from_config(config: &TokenServiceConfig) -> Self {
        Self::new(config.secret.as_bytes(), config.issuer.clone())
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&self.header, claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to encode token");
            TokenError::GenerationFailed
        })
    }

    /// Decode and verify a token, failing with `InvalidSignature` on any
    /// encoding, algorithm, signature or issuer problem
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token verification failed");
                TokenError::InvalidSignature
            })
    }
}
