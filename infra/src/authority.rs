//! Remote token authority: asks the token-owning service whether an access
//! token is currently valid.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tt_core::errors::{DomainError, TokenError};
use tt_core::services::TokenAuthority;
use tt_shared::DelegationConfig;

use crate::http::{build_http_client, HttpConfig};
use crate::InfrastructureError;

/// Path of the delegation endpoint on the authority
pub const VALIDATE_TOKEN_PATH: &str = "/auth/validate-token";

#[derive(Serialize)]
struct ValidateTokenRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct ValidateTokenResponse {
    valid: bool,
}

/// `TokenAuthority` that delegates to `POST {authority}/auth/validate-token`.
///
/// Every call is bounded by `timeout`. Unreachable hosts, non-2xx statuses,
/// unparseable bodies and timeouts all surface as `TransportFailure`.
pub struct RemoteTokenAuthority {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl RemoteTokenAuthority {
    pub fn new(authority_url: &str, timeout: Duration) -> Result<Self, InfrastructureError> {
        let client = build_http_client(&HttpConfig::default().with_timeout(timeout))?;
        Ok(Self::with_client(client, authority_url, timeout))
    }

    pub fn with_client(client: Client, authority_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", authority_url.trim_end_matches('/'), VALIDATE_TOKEN_PATH),
            timeout,
        }
    }

    pub fn from_config(config: &DelegationConfig) -> Result<Self, InfrastructureError> {
        Self::new(&config.authority_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, token: &str) -> Result<bool, reqwest::Error> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(&ValidateTokenRequest { token })
            .send()
            .await?
            .error_for_status()?;

        let body: ValidateTokenResponse = response.json().await?;
        Ok(body.valid)
    }
}

#[async_trait]
impl TokenAuthority for RemoteTokenAuthority {
    async fn validate_access(&self, token: &str) -> Result<bool, DomainError> {
        match tokio::time::timeout(self.timeout, self.call(token)).await {
            Ok(Ok(valid)) => {
                debug!(valid, "Token authority answered");
                Ok(valid)
            }
            Ok(Err(e)) => {
                warn!(error = %e, endpoint = %self.endpoint, "Token authority call failed");
                Err(TokenError::TransportFailure {
                    reason: e.to_string(),
                }
                .into())
            }
            Err(_) => {
                warn!(endpoint = %self.endpoint, "Token authority call timed out");
                Err(TokenError::TransportFailure {
                    reason: format!("no answer within {}ms", self.timeout.as_millis()),
                }
                .into())
            }
        }
    }
}
