//! Tests for login, rotation, logout and delegated validation

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::Principal;
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{
    BlacklistStore, InMemoryBlacklistStore, InMemoryPrincipalDirectory, InMemoryRefreshTokenStore,
    RefreshTokenStore,
};
use crate::services::auth::AuthService;
use crate::services::token::TokenServiceConfig;

const SECRET: &str = "0123456789abcdef0123456789abcdef";
const ALICE: &str = "alice@example.com";
const PASSWORD: &str = "correct horse";

struct Harness {
    service: Arc<AuthService>,
    refresh_tokens: Arc<InMemoryRefreshTokenStore>,
    blacklist: Arc<InMemoryBlacklistStore>,
    alice: Principal,
}

async fn harness_with(config: TokenServiceConfig) -> Harness {
    let refresh_tokens = Arc::new(InMemoryRefreshTokenStore::new());
    let blacklist = Arc::new(InMemoryBlacklistStore::new());
    let principals = Arc::new(InMemoryPrincipalDirectory::with_cost(4));

    let alice = Principal::new(ALICE, "Alice", vec!["USER".into()]);
    principals.insert(alice.clone(), PASSWORD).await.unwrap();
    principals
        .insert(Principal::new("bob@example.com", "Bob", vec![]), "hunter2")
        .await
        .unwrap();

    let service = Arc::new(AuthService::new(
        &config,
        refresh_tokens.clone(),
        blacklist.clone(),
        principals,
    ));

    Harness {
        service,
        refresh_tokens,
        blacklist,
        alice,
    }
}

async fn harness() -> Harness {
    harness_with(TokenServiceConfig::new(SECRET, 900, 604800)).await
}

fn token_error(err: DomainError) -> TokenError {
    match err {
        DomainError::Token(e) => e,
        other => panic!("expected a token error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_login_issues_valid_pair_and_persists_refresh() {
    let h = harness().await;

    let pair = h.service.login(ALICE, PASSWORD).await.unwrap();

    assert!(h.service.validate_token(&pair.access_token).await);
    let record = h.refresh_tokens.find(&pair.refresh_token).await.unwrap().unwrap();
    assert_eq!(record.principal_id, h.alice.id);
}

#[tokio::test]
async fn test_login_with_wrong_password() {
    let h = harness().await;

    let err = h.service.login(ALICE, "wrong").await.unwrap_err();
    assert!(matches!(err, DomainError::Auth(AuthError::InvalidCredentials)));
    assert!(h.refresh_tokens.is_empty().await);
}

#[tokio::test]
async fn test_alice_rotation_scenario() {
    let h = harness().await;
    let validator = h.service.validator();

    let first = h.service.login(ALICE, PASSWORD).await.unwrap();
    let second = h
        .service
        .rotate(&first.refresh_token, Some(&first.access_token))
        .await
        .unwrap();

    assert!(!validator.validate_access(&first.access_token, ALICE).await);
    assert!(h.blacklist.contains(&first.access_token).await.unwrap());

    let replay = h.service.rotate(&first.refresh_token, None).await.unwrap_err();
    assert_eq!(token_error(replay), TokenError::Unauthorized);

    assert!(validator.validate_access(&second.access_token, ALICE).await);
    assert!(validator.validate_refresh_usable(&second.refresh_token, ALICE).await);
}

#[tokio::test]
async fn test_rotation_without_access_token_blacklists_nothing() {
    let h = harness().await;
    let first = h.service.login(ALICE, PASSWORD).await.unwrap();

    h.service.rotate(&first.refresh_token, None).await.unwrap();

    assert!(h.blacklist.is_empty().await);
    assert!(h.service.validate_token(&first.access_token).await);
}

#[tokio::test]
async fn test_rotation_ignores_foreign_access_token() {
    let h = harness().await;
    let alice = h.service.login(ALICE, PASSWORD).await.unwrap();
    let bob = h.service.login("bob@example.com", "hunter2").await.unwrap();

    h.service
        .rotate(&alice.refresh_token, Some(&bob.access_token))
        .await
        .unwrap();

    assert!(h.service.validate_token(&bob.access_token).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_rotation_has_exactly_one_winner() {
    let h = harness().await;
    let first = h.service.login(ALICE, PASSWORD).await.unwrap();

    let a = {
        let service = h.service.clone();
        let token = first.refresh_token.clone();
        tokio::spawn(async move { service.rotate(&token, None).await })
    };
    let b = {
        let service = h.service.clone();
        let token = first.refresh_token.clone();
        tokio::spawn(async move { service.rotate(&token, None).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);

    for result in results {
        if let Err(err) = result {
            assert_eq!(token_error(err), TokenError::Unauthorized);
        }
    }

    let records = h.refresh_tokens.find_by_principal(h.alice.id).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_ne!(records[0].token, first.refresh_token);
}

#[tokio::test]
async fn test_access_token_cannot_be_rotated() {
    let h = harness().await;
    let pair = h.service.login(ALICE, PASSWORD).await.unwrap();

    let err = h.service.rotate(&pair.access_token, None).await.unwrap_err();
    assert!(matches!(token_error(err), TokenError::WrongTokenType { .. }));

    // The real refresh token is untouched
    assert!(h.refresh_tokens.find(&pair.refresh_token).await.unwrap().is_some());
}

#[tokio::test]
async fn test_garbage_refresh_token_is_unauthorized() {
    let h = harness().await;

    let err = h.service.rotate("not-a-token", None).await.unwrap_err();
    assert_eq!(token_error(err), TokenError::Unauthorized);
}

#[tokio::test]
async fn test_expired_refresh_token_is_unauthorized_and_removed() {
    let h = harness_with(TokenServiceConfig::new(SECRET, 0, 0)).await;
    let pair = h.service.login(ALICE, PASSWORD).await.unwrap();
    assert_eq!(h.refresh_tokens.len().await, 1);

    let err = h.service.rotate(&pair.refresh_token, None).await.unwrap_err();
    assert_eq!(token_error(err), TokenError::Unauthorized);
    assert!(h.refresh_tokens.is_empty().await);
}

#[tokio::test]
async fn test_rotation_for_removed_principal() {
    let h = harness().await;
    let config = TokenServiceConfig::new(SECRET, 900, 604800);

    // Same secret and stores, but a directory that no longer knows alice
    let other = AuthService::new(
        &config,
        h.refresh_tokens.clone(),
        h.blacklist.clone(),
        Arc::new(InMemoryPrincipalDirectory::with_cost(4)),
    );
    let pair = h.service.login(ALICE, PASSWORD).await.unwrap();

    let err = other.rotate(&pair.refresh_token, None).await.unwrap_err();
    assert_eq!(token_error(err), TokenError::PrincipalNotFound);
    assert!(!other.validate_token(&pair.access_token).await);
}

#[tokio::test]
async fn test_logout_revokes_access_and_refresh() {
    let h = harness().await;
    let pair = h.service.login(ALICE, PASSWORD).await.unwrap();

    h.service.logout(&pair.access_token).await.unwrap();

    assert!(!h.service.validate_token(&pair.access_token).await);
    assert!(!h.service.validator().validate_access(&pair.access_token, ALICE).await);
    let err = h.service.rotate(&pair.refresh_token, None).await.unwrap_err();
    assert_eq!(token_error(err), TokenError::Unauthorized);
}

#[tokio::test]
async fn test_logout_with_garbage_is_a_no_op() {
    let h = harness().await;
    let pair = h.service.login(ALICE, PASSWORD).await.unwrap();

    h.service.logout("garbage").await.unwrap();

    assert!(h.blacklist.is_empty().await);
    assert!(h.service.validate_token(&pair.access_token).await);
}

#[tokio::test]
async fn test_validate_token_rejects_refresh_tokens() {
    let h = harness().await;
    let pair = h.service.login(ALICE, PASSWORD).await.unwrap();

    assert!(!h.service.validate_token(&pair.refresh_token).await);
}

struct UnavailableBlacklist;

#[async_trait]
impl BlacklistStore for UnavailableBlacklist {
    async fn add(&self, _token: &str, _expires_at: DateTime<Utc>) -> Result<(), DomainError> {
        Err(DomainError::storage("blacklist unavailable"))
    }

    async fn contains(&self, _token: &str) -> Result<bool, DomainError> {
        Err(DomainError::storage("blacklist unavailable"))
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        Ok(0)
    }
}

#[tokio::test]
async fn test_blacklist_failure_does_not_block_rotation() {
    let refresh_tokens = Arc::new(InMemoryRefreshTokenStore::new());
    let principals = Arc::new(InMemoryPrincipalDirectory::with_cost(4));
    principals
        .insert(Principal::new(ALICE, "Alice", vec![]), PASSWORD)
        .await
        .unwrap();
    let service = AuthService::new(
        &TokenServiceConfig::new(SECRET, 900, 604800),
        refresh_tokens.clone(),
        Arc::new(UnavailableBlacklist),
        principals,
    );

    let first = service.login(ALICE, PASSWORD).await.unwrap();
    let second = service
        .rotate(&first.refresh_token, Some(&first.access_token))
        .await
        .unwrap();

    assert!(refresh_tokens.find(&second.refresh_token).await.unwrap().is_some());
    // Fail closed when the blacklist cannot be read
    assert!(!service.validate_token(&second.access_token).await);
}
