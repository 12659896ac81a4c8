//! # Infrastructure Layer
//!
//! Concrete adapters behind the contracts defined in `gk_core`:
//! - **Cache**: Redis client with retry and a Redis-backed `CacheService`
//! - **Password**: bcrypt implementation of `PasswordHasher`
//! - **Telemetry**: `tracing` subscriber initialization from `LoggingConfig`
//!
//! ## Features
//!
//! - `redis-cache`: Enable the async Redis transport (default)

use std::sync::Arc;

use gk_core::cache::{CacheService, MemoryCacheService};
use gk_core::errors::DomainError;
use gk_shared::config::{CacheBackend, CacheConfig};

/// Cache module - Redis client and cache service
pub mod cache;

/// Password hashing module
pub mod password;

/// Tracing subscriber setup
pub mod telemetry;

pub use cache::{RedisCacheService, RedisClient};
pub use password::BcryptPasswordHasher;
pub use telemetry::init_tracing;

/// Construct the cache backend selected by configuration
///
/// The memory backend honours `default_ttl` like the Redis one so that
/// switching backends does not change expiry behaviour.
pub async fn build_cache(config: &CacheConfig) -> Result<Arc<dyn CacheService>, InfrastructureError> {
    match config.backend {
        CacheBackend::Memory => {
            tracing::info!("Using in-memory cache backend");
            let cache = match config.default_ttl {
                Some(ttl) => MemoryCacheService::with_default_ttl(ttl),
                None => MemoryCacheService::new(),
            };
            Ok(Arc::new(cache))
        }
        CacheBackend::Redis => {
            let client = RedisClient::new(config.clone()).await?;
            Ok(Arc::new(RedisCacheService::new(client)))
        }
    }
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Redis cache error
    #[error("Cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Stored value has an unexpected shape
    #[error("Unexpected cache value: {0}")]
    InvalidValue(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Password hashing failure
    #[error("Password hashing error: {0}")]
    Hashing(#[from] bcrypt::BcryptError),

    /// Blocking task failed to complete
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<InfrastructureError> for DomainError {
    fn from(err: InfrastructureError) -> Self {
        match err {
            InfrastructureError::Cache(_) | InfrastructureError::InvalidValue(_) => {
                DomainError::Cache {
                    message: err.to_string(),
                }
            }
            InfrastructureError::Config(_) => DomainError::Configuration {
                message: err.to_string(),
            },
            InfrastructureError::Hashing(_) | InfrastructureError::Task(_) => {
                DomainError::Internal {
                    message: err.to_string(),
                }
            }
        }
    }
}
