//! In-memory credential store

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::user::UserRecord;
use crate::errors::{AuthError, DomainError};

use super::trait_::CredentialStore;

/// Credential store keeping users in a process-local map
///
/// Suitable for tests and single-process deployments; contents are lost on
/// restart. Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct InMemoryCredentialStore {
    users: Arc<RwLock<HashMap<Uuid, UserRecord>>>,
}

impl InMemoryCredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users
    pub async fn count(&self) -> usize {
        self.users.read().await.len()
    }
}

fn matches_identifier(user: &UserRecord, identifier: &str) -> bool {
    user.email.eq_ignore_ascii_case(identifier) || user.username == identifier
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserRecord>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| matches_identifier(u, identifier))
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, DomainError> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn create(&self, user: UserRecord) -> Result<UserRecord, DomainError> {
        let mut users = self.users.write().await;

        // Check for duplicate email or username
        if users.values().any(|u| {
            u.id == user.id
                || u.email.eq_ignore_ascii_case(&user.email)
                || u.username == user.username
        }) {
            return Err(DomainError::Auth(AuthError::UserAlreadyExists));
        }

        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn update(&self, mut user: UserRecord) -> Result<UserRecord, DomainError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id) {
            Some(existing) => {
                user.touch();
                *existing = user.clone();
                Ok(user)
            }
            None => Err(DomainError::NotFound {
                resource: format!("user {}", user.id),
            }),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        let mut users = self.users.write().await;
        users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DomainError::NotFound {
                resource: format!("user {}", id),
            })
    }

    async fn exists(&self, identifier: &str) -> Result<bool, DomainError> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| matches_identifier(u, identifier)))
    }
}
