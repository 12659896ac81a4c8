//! Cache module for Redis-based caching
//!
//! Provides the Redis transport with retry logic and the `CacheService`
//! implementation that the token service and rate limiter run on.

pub mod redis_cache;
pub mod redis_client;

#[cfg(test)]
mod tests;

pub use redis_cache::RedisCacheService;
pub use redis_client::RedisClient;

// Re-export commonly used types
pub use gk_shared::config::CacheConfig;
