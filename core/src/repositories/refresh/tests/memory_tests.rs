//! Unit tests for the in-memory refresh store

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::domain::entities::RefreshRecord;
use crate::repositories::refresh::{InMemoryRefreshTokenStore, RefreshTokenStore};

fn record(token: &str, principal_id: Uuid, ttl: Duration) -> RefreshRecord {
    RefreshRecord::new(token, principal_id, Utc::now() + ttl)
}

#[tokio::test]
async fn test_save_and_find() {
    let store = InMemoryRefreshTokenStore::new();
    let owner = Uuid::new_v4();

    store.save(record("r0", owner, Duration::hours(1))).await.unwrap();

    let found = store.find("r0").await.unwrap().unwrap();
    assert_eq!(found.principal_id, owner);
    assert!(store.find("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_consume_is_single_use() {
    let store = InMemoryRefreshTokenStore::new();
    store.save(record("r0", Uuid::new_v4(), Duration::hours(1))).await.unwrap();

    assert!(store.consume("r0").await.unwrap().is_some());
    assert!(store.consume("r0").await.unwrap().is_none());
    assert!(store.find("r0").await.unwrap().is_none());
}

#[tokio::test]
async fn test_concurrent_consume_has_one_winner() {
    let store = Arc::new(InMemoryRefreshTokenStore::new());
    store.save(record("r0", Uuid::new_v4(), Duration::hours(1))).await.unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move { store.consume("r0").await.unwrap() }));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_some() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test]
async fn test_delete_is_idempotent() {
    let store = InMemoryRefreshTokenStore::new();
    store.save(record("r0", Uuid::new_v4(), Duration::hours(1))).await.unwrap();

    assert!(store.delete("r0").await.unwrap());
    assert!(!store.delete("r0").await.unwrap());
}

#[tokio::test]
async fn test_delete_by_principal_leaves_others() {
    let store = InMemoryRefreshTokenStore::new();
    let alice = Uuid::new_v4();
    let bob = Uuid::new_v4();
    store.save(record("a1", alice, Duration::hours(1))).await.unwrap();
    store.save(record("a2", alice, Duration::hours(1))).await.unwrap();
    store.save(record("b1", bob, Duration::hours(1))).await.unwrap();

    assert_eq!(store.find_by_principal(alice).await.unwrap().len(), 2);
    assert_eq!(store.delete_by_principal(alice).await.unwrap(), 2);
    assert!(store.find_by_principal(alice).await.unwrap().is_empty());
    assert_eq!(store.len().await, 1);
}

#[tokio::test]
async fn test_purge_expired() {
    let store = InMemoryRefreshTokenStore::new();
    let owner = Uuid::new_v4();
    store.save(record("old", owner, Duration::seconds(-5))).await.unwrap();
    store.save(record("live", owner, Duration::hours(1))).await.unwrap();

    assert_eq!(store.purge_expired().await.unwrap(), 1);
    assert!(store.find("live").await.unwrap().is_some());
    assert!(store.find("old").await.unwrap().is_none());
}
