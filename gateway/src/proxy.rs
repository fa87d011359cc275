//! Forwarding of accepted requests to the upstream service

use actix_web::{
    http::{
        header::{HeaderName, HeaderValue},
        StatusCode,
    },
    web, HttpRequest, HttpResponse,
};
use thiserror::Error;
use tracing::{debug, error};

use tt_shared::{error_codes, ErrorResponse};

/// Connection-level headers that are never copied across the hop
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "content-length",
    "host",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("Unsupported method: {0}")]
    Method(String),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// Client for the single upstream behind the gateway
pub struct UpstreamProxy {
    client: reqwest::Client,
    upstream_url: String,
}

impl UpstreamProxy {
    pub fn new(client: reqwest::Client, upstream_url: impl Into<String>) -> Self {
        Self {
            client,
            upstream_url: upstream_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn upstream_url(&self) -> &str {
        &self.upstream_url
    }

    /// Replay the request upstream with the same method, path, query,
    /// end-to-end headers and body, and relay the answer back
    pub async fn forward(&self, req: &HttpRequest, body: web::Bytes) -> Result<HttpResponse, ProxyError> {
        let path_and_query = req.uri().path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        let url = format!("{}{}", self.upstream_url, path_and_query);

        let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
            .map_err(|_| ProxyError::Method(req.method().to_string()))?;

        let mut outbound = self.client.request(method, &url);
        for (name, value) in req.headers() {
            if !is_hop_by_hop(name.as_str()) {
                outbound = outbound.header(name.as_str(), value.as_bytes());
            }
        }
        if let Some(peer) = req.peer_addr() {
            outbound = outbound.header("x-forwarded-for", peer.ip().to_string());
        }

        debug!(method = %req.method(), url = %url, "Forwarding request");
        let upstream = outbound.body(body.to_vec()).send().await?;

        let status = StatusCode::from_u16(upstream.status().as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
        let mut response = HttpResponse::build(status);
        for (name, value) in upstream.headers() {
            if is_hop_by_hop(name.as_str()) {
                continue;
            }
            if let (Ok(name), Ok(value)) = (
                HeaderName::from_bytes(name.as_str().as_bytes()),
                HeaderValue::from_bytes(value.as_bytes()),
            ) {
                response.append_header((name, value));
            }
        }

        let bytes = upstream.bytes().await?;
        Ok(response.body(bytes.to_vec()))
    }
}

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// Default service of the gateway: forward anything that got past the bearer check
pub async fn forward(
    req: HttpRequest,
    body: web::Bytes,
    proxy: web::Data<UpstreamProxy>,
) -> HttpResponse {
    match proxy.forward(&req, body).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, upstream = %proxy.upstream_url(), "Forwarding failed");
            HttpResponse::BadGateway().json(ErrorResponse::new(
                error_codes::BAD_GATEWAY,
                "Upstream service unavailable",
            ))
        }
    }
}
