//! Integration tests for delegated validation at the gateway

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use actix_web::{http::header, http::StatusCode, test, web};
use async_trait::async_trait;
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use tt_core::errors::{DomainError, TokenError};
use tt_core::services::TokenAuthority;
use tt_gateway::app::create_app;
use tt_gateway::proxy::UpstreamProxy;
use tt_infra::RemoteTokenAuthority;
use tt_shared::DelegationConfig;

/// Authority with a fixed answer that counts how often it is asked
struct FixedAuthority {
    answer: Result<bool, ()>,
    calls: AtomicUsize,
}

impl FixedAuthority {
    fn new(answer: Result<bool, ()>) -> Arc<Self> {
        Arc::new(Self {
            answer,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenAuthority for FixedAuthority {
    async fn validate_access(&self, _token: &str) -> Result<bool, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.map_err(|_| {
            TokenError::TransportFailure {
                reason: "connection refused".to_string(),
            }
            .into()
        })
    }
}

/// Serve one canned HTTP response per connection after `delay`, counting connections
async fn serve(body: &'static str, delay: Duration, hits: Arc<AtomicUsize>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            hits.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut buf = vec![0u8; 8192];
                let _ = socket.read(&mut buf).await;
                tokio::time::sleep(delay).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
            });
        }
    });

    format!("http://{}", addr)
}

fn delegation(upstream_url: &str) -> Arc<DelegationConfig> {
    Arc::new(DelegationConfig {
        authority_url: "http://auth.invalid".to_string(),
        timeout_ms: 100,
        public_paths: vec!["/auth/".to_string()],
        upstream_url: upstream_url.to_string(),
    })
}

fn proxy(upstream_url: &str) -> web::Data<UpstreamProxy> {
    web::Data::new(UpstreamProxy::new(reqwest::Client::new(), upstream_url))
}

macro_rules! status_of {
    ($app:expr, $req:expr) => {{
        match test::try_call_service(&$app, $req).await {
            Ok(resp) => resp.status(),
            Err(err) => err.error_response().status(),
        }
    }};
}

#[actix_web::test]
async fn test_accepted_request_is_forwarded() {
    let hits = Arc::new(AtomicUsize::new(0));
    let upstream = serve(r#"{"tasks":[]}"#, Duration::ZERO, hits.clone()).await;
    let authority = FixedAuthority::new(Ok(true));

    let app = test::init_service(create_app(authority.clone(), delegation(&upstream), proxy(&upstream))).await;

    let req = test::TestRequest::get()
        .uri("/tasks?page=2")
        .insert_header((header::AUTHORIZATION, "Bearer good"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["tasks"], serde_json::json!([]));
    assert_eq!(authority.calls(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_rejected_token_is_unauthorized() {
    let hits = Arc::new(AtomicUsize::new(0));
    let upstream = serve("{}", Duration::ZERO, hits.clone()).await;
    let authority = FixedAuthority::new(Ok(false));

    let app = test::init_service(create_app(authority.clone(), delegation(&upstream), proxy(&upstream))).await;

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header((header::AUTHORIZATION, "Bearer revoked"))
        .to_request();

    assert_eq!(status_of!(app, req), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_authority_failure_fails_closed() {
    let hits = Arc::new(AtomicUsize::new(0));
    let upstream = serve("{}", Duration::ZERO, hits.clone()).await;
    let authority = FixedAuthority::new(Err(()));

    let app = test::init_service(create_app(authority, delegation(&upstream), proxy(&upstream))).await;

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header((header::AUTHORIZATION, "Bearer whatever"))
        .to_request();

    assert_eq!(status_of!(app, req), StatusCode::UNAUTHORIZED);
    assert_eq!(hits.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_missing_bearer_is_rejected_before_delegation() {
    let hits = Arc::new(AtomicUsize::new(0));
    let upstream = serve("{}", Duration::ZERO, hits.clone()).await;
    let authority = FixedAuthority::new(Ok(true));

    let app = test::init_service(create_app(authority.clone(), delegation(&upstream), proxy(&upstream))).await;

    let req = test::TestRequest::get().uri("/tasks").to_request();
    assert_eq!(status_of!(app, req), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
        .to_request();
    assert_eq!(status_of!(app, req), StatusCode::UNAUTHORIZED);

    assert_eq!(authority.calls(), 0);
}

#[actix_web::test]
async fn test_public_path_skips_delegation() {
    let hits = Arc::new(AtomicUsize::new(0));
    let upstream = serve(r#"{"accessToken":"a"}"#, Duration::ZERO, hits.clone()).await;
    let authority = FixedAuthority::new(Ok(false));

    let app = test::init_service(create_app(authority.clone(), delegation(&upstream), proxy(&upstream))).await;

    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(serde_json::json!({ "email": "alice@example.com", "password": "pw" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(authority.calls(), 0);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_slow_remote_authority_fails_closed() {
    let upstream_hits = Arc::new(AtomicUsize::new(0));
    let upstream = serve("{}", Duration::ZERO, upstream_hits.clone()).await;
    let authority_url = serve(r#"{"valid":true}"#, Duration::from_secs(5), Arc::new(AtomicUsize::new(0))).await;

    let authority = RemoteTokenAuthority::new(&authority_url, Duration::from_millis(100)).unwrap();
    let app = test::init_service(create_app(Arc::new(authority), delegation(&upstream), proxy(&upstream))).await;

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header((header::AUTHORIZATION, "Bearer good"))
        .to_request();

    assert_eq!(status_of!(app, req), StatusCode::UNAUTHORIZED);
    assert_eq!(upstream_hits.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    let authority = FixedAuthority::new(Ok(true));
    let upstream = "http://127.0.0.1:1";

    let app = test::init_service(create_app(authority, delegation(upstream), proxy(upstream))).await;

    let req = test::TestRequest::get()
        .uri("/tasks")
        .insert_header((header::AUTHORIZATION, "Bearer good"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
}

#[actix_web::test]
async fn test_health_needs_no_token() {
    let authority = FixedAuthority::new(Ok(false));
    let upstream = "http://127.0.0.1:1";

    let app = test::init_service(create_app(authority.clone(), delegation(upstream), proxy(upstream))).await;

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(authority.calls(), 0);
}
