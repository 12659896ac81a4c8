//! Unit tests for the in-memory credential store

use uuid::Uuid;

use crate::domain::entities::user::UserRecord;
use crate::errors::{AuthError, DomainError};
use crate::repositories::user::{CredentialStore, InMemoryCredentialStore};

fn user(email: &str, username: &str) -> UserRecord {
    UserRecord::new(email.to_string(), username.to_string(), "hash".to_string())
}

#[tokio::test]
async fn test_create_and_find() {
    let store = InMemoryCredentialStore::new();
    let alice = user("alice@example.com", "alice_1001");

    let created = store.create(alice.clone()).await.unwrap();
    assert_eq!(created.id, alice.id);

    assert_eq!(store.find_by_id(alice.id).await.unwrap(), Some(alice.clone()));
    assert_eq!(
        store.find_by_email("ALICE@example.com").await.unwrap(),
        Some(alice.clone())
    );
    assert_eq!(
        store.find_by_identifier("alice_1001").await.unwrap(),
        Some(alice.clone())
    );
    assert_eq!(
        store.find_by_identifier("alice@example.com").await.unwrap(),
        Some(alice)
    );
    assert!(store.find_by_identifier("bob").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let store = InMemoryCredentialStore::new();
    store.create(user("alice@example.com", "alice_1")).await.unwrap();

    let result = store.create(user("Alice@Example.com", "alice_2")).await;
    assert!(matches!(
        result,
        Err(DomainError::Auth(AuthError::UserAlreadyExists))
    ));
    assert_eq!(store.count().await, 1);
}

#[tokio::test]
async fn test_exists() {
    let store = InMemoryCredentialStore::new();
    store.create(user("alice@example.com", "alice_1")).await.unwrap();

    assert!(store.exists("alice@example.com").await.unwrap());
    assert!(store.exists("alice_1").await.unwrap());
    assert!(!store.exists("bob@example.com").await.unwrap());
}

#[tokio::test]
async fn test_update_existing_user() {
    let store = InMemoryCredentialStore::new();
    let mut alice = store
        .create(user("alice@example.com", "alice_1"))
        .await
        .unwrap();

    alice.password_hash = "new-hash".to_string();
    let updated = store.update(alice.clone()).await.unwrap();
    assert!(updated.updated_at >= alice.updated_at);

    let found = store.find_by_id(alice.id).await.unwrap().unwrap();
    assert_eq!(found.password_hash, "new-hash");
}

#[tokio::test]
async fn test_update_missing_user_is_not_found() {
    let store = InMemoryCredentialStore::new();
    let result = store.update(user("ghost@example.com", "ghost")).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_delete() {
    let store = InMemoryCredentialStore::new();
    let alice = store
        .create(user("alice@example.com", "alice_1"))
        .await
        .unwrap();

    store.delete(alice.id).await.unwrap();
    assert!(store.find_by_id(alice.id).await.unwrap().is_none());

    let result = store.delete(Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_clones_share_state() {
    let store = InMemoryCredentialStore::new();
    let other = store.clone();
    store.create(user("alice@example.com", "alice_1")).await.unwrap();
    assert_eq!(other.count().await, 1);
}
