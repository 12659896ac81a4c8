//! Mock implementations for testing authentication service

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::DomainResult;
use crate::services::auth::PasswordHasher;

/// Reversible stand-in for a real password hash
pub struct MockPasswordHasher {
    pub hash_calls: AtomicUsize,
}

impl MockPasswordHasher {
    pub fn new() -> Self {
        Self {
            hash_calls: AtomicUsize::new(0),
        }
    }

    pub fn hash_of(password: &str) -> String {
        format!("hashed:{}", password)
    }
}

#[async_trait]
impl PasswordHasher for MockPasswordHasher {
    async fn hash(&self, password: &str) -> DomainResult<String> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        Ok(Self::hash_of(password))
    }

    async fn compare(&self, password: &str, hash: &str) -> DomainResult<bool> {
        Ok(Self::hash_of(password) == hash)
    }
}
