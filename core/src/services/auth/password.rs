//! Password hashing contract

use async_trait::async_trait;

use crate::errors::DomainResult;

/// Trait for one-way password hashing
///
/// Implementations are expected to be slow on purpose; callers treat both
/// methods as potentially blocking work.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password
    async fn hash(&self, password: &str) -> DomainResult<String>;

    /// Check a plaintext password against a stored hash
    async fn compare(&self, password: &str, hash: &str) -> DomainResult<bool>;
}
