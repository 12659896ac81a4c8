//! Integration tests for the Redis cache service
//!
//! These need a live server: `REDIS_URL=redis://localhost:6379 cargo test -- --ignored`

use std::sync::Arc;

use gk_core::cache::{CacheService, CacheServiceExt, Sha256KeyGenerator};
use gk_core::domain::entities::token::TokenKind;
use gk_core::services::{ProgressiveRateLimiter, RateLimiterTrait, TokenService, TokenServiceConfig};
use gk_infra::{RedisCacheService, RedisClient};
use gk_shared::config::{CacheConfig, RateLimitConfig};

async fn redis_cache() -> RedisCacheService {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let mut config = CacheConfig::redis(url);
    // Isolate each test run from the others and from real data
    config.key_prefix = Some(format!("gk-test:{}", uuid::Uuid::new_v4().simple()));

    let client = RedisClient::new(config).await.expect("Redis should be reachable");
    RedisCacheService::new(client)
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_basic_operations() {
    let cache = redis_cache().await;

    cache.set("greeting", "hello".to_string(), Some(60)).await.unwrap();
    assert_eq!(cache.get("greeting").await.unwrap(), Some("hello".to_string()));
    assert!(cache.exists("greeting").await.unwrap());

    let ttl = cache.get_ttl("greeting").await.unwrap().unwrap();
    assert!(ttl > 0 && ttl <= 60);

    cache.delete("greeting").await.unwrap();
    assert_eq!(cache.get("greeting").await.unwrap(), None);
    assert!(!cache.exists("greeting").await.unwrap());

    // Deleting again is not an error
    cache.delete("greeting").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_zero_ttl_and_no_expiry() {
    let cache = redis_cache().await;

    cache.set("gone", "value".to_string(), Some(0)).await.unwrap();
    assert_eq!(cache.get("gone").await.unwrap(), None);
    assert_eq!(cache.get_ttl("gone").await.unwrap(), None);

    cache.set("forever", "value".to_string(), None).await.unwrap();
    assert_eq!(cache.get_ttl("forever").await.unwrap(), None);
    assert!(cache.exists("forever").await.unwrap());
    cache.delete("forever").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_increment_is_atomic_and_sets_ttl() {
    let cache = Arc::new(redis_cache().await);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let cache = cache.clone();
        handles.push(tokio::spawn(async move {
            cache.increment("counter", Some(30)).await.unwrap()
        }));
    }
    let mut counts = Vec::new();
    for handle in handles {
        counts.push(handle.await.unwrap());
    }
    counts.sort_unstable();

    assert_eq!(counts, (1..=20).collect::<Vec<i64>>());
    let ttl = cache.get_ttl("counter").await.unwrap().unwrap();
    assert!(ttl > 0 && ttl <= 30);
    cache.delete("counter").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_json_round_trip() {
    let cache = redis_cache().await;

    cache.set_json("numbers", &vec![1, 2, 3], Some(60)).await.unwrap();
    let numbers: Option<Vec<i32>> = cache.get_json("numbers").await.unwrap();
    assert_eq!(numbers, Some(vec![1, 2, 3]));
    cache.delete("numbers").await.unwrap();
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_token_lifecycle_on_redis() {
    let cache: Arc<dyn CacheService> = Arc::new(redis_cache().await);
    let config = TokenServiceConfig {
        access_secret: "integration-access-secret".to_string(),
        refresh_secret: "integration-refresh-secret".to_string(),
        access_lifetime_seconds: 60,
        refresh_lifetime_seconds: 120,
        issuer: "gatekeeper".to_string(),
    };
    let tokens = TokenService::with_config(config, cache, Arc::new(Sha256KeyGenerator::new()));

    let token = tokens.issue_access_token("user-42").await.unwrap();
    assert_eq!(tokens.verify(&token, TokenKind::Access).await, Some("user-42".to_string()));

    tokens.revoke(&token, TokenKind::Access).await;
    assert_eq!(tokens.verify(&token, TokenKind::Access).await, None);
}

#[tokio::test]
#[ignore] // Requires Redis server
async fn test_rate_limiter_on_redis() {
    let cache: Arc<dyn CacheService> = Arc::new(redis_cache().await);
    let limiter = ProgressiveRateLimiter::new(cache, RateLimitConfig::new(3, 60, 30));
    let identifier = "203.0.113.9:carol@example.com";

    assert!(limiter.record_attempt(identifier).await.unwrap());
    assert!(limiter.record_attempt(identifier).await.unwrap());
    assert!(!limiter.record_attempt(identifier).await.unwrap());

    assert!(limiter.is_blocked(identifier).await.unwrap());
    let remaining = limiter.get_block_time_remaining(identifier).await.unwrap();
    assert!(remaining > 0 && remaining <= 30);
    assert_eq!(limiter.violation_count(identifier).await.unwrap(), 1);
}
