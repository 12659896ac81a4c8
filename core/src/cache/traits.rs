//! Cache service contracts

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::errors::{DomainError, DomainResult};

/// Trait for a string-valued cache with per-entry expiration
///
/// TTLs are whole seconds. `None` means the entry does not expire unless the
/// backend is configured with a default TTL. `Some(0)` stores nothing that a
/// later read can observe.
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Store a value, replacing any prior entry under the key
    async fn set(&self, key: &str, value: String, ttl_seconds: Option<u64>) -> DomainResult<()>;

    /// Fetch a live value
    async fn get(&self, key: &str) -> DomainResult<Option<String>>;

    /// Remove an entry; missing keys are not an error
    async fn delete(&self, key: &str) -> DomainResult<()>;

    /// Check whether a live entry exists
    async fn exists(&self, key: &str) -> DomainResult<bool>;

    /// Remaining lifetime in seconds, rounded up
    ///
    /// Returns `None` both for a missing entry and for one without expiry.
    async fn get_ttl(&self, key: &str) -> DomainResult<Option<u64>>;

    /// Atomically increment an integer counter and refresh its TTL
    ///
    /// A missing counter starts from zero, so the first call returns 1.
    async fn increment(&self, key: &str, ttl_seconds: Option<u64>) -> DomainResult<i64>;
}

/// Typed JSON helpers available on every [`CacheService`]
#[async_trait]
pub trait CacheServiceExt: CacheService {
    /// Serialize a value to JSON and store it
    async fn set_json<T>(&self, key: &str, value: &T, ttl_seconds: Option<u64>) -> DomainResult<()>
    where
        T: Serialize + Sync + ?Sized,
    {
        let encoded = serde_json::to_string(value).map_err(|e| DomainError::Serialization {
            message: format!("Failed to encode cache value for '{}': {}", key, e),
        })?;
        self.set(key, encoded, ttl_seconds).await
    }

    /// Fetch and decode a JSON value
    async fn get_json<T>(&self, key: &str) -> DomainResult<Option<T>>
    where
        T: DeserializeOwned + Send,
    {
        match self.get(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|e| DomainError::Serialization {
                    message: format!("Failed to decode cache value for '{}': {}", key, e),
                }),
            None => Ok(None),
        }
    }
}

impl<C: CacheService + ?Sized> CacheServiceExt for C {}
