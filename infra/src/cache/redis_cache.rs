//! Redis-backed implementation of the core cache contract

use async_trait::async_trait;

use gk_core::cache::CacheService;
use gk_core::errors::DomainResult;

use super::redis_client::RedisClient;

/// [`CacheService`] over a shared Redis server
///
/// Keys are namespaced with `cache.key_prefix` and writes without a TTL fall
/// back to `cache.default_ttl`, both taken from the client's configuration.
#[derive(Clone)]
pub struct RedisCacheService {
    client: RedisClient,
}

impl RedisCacheService {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Underlying client, for health checks
    pub fn client(&self) -> &RedisClient {
        &self.client
    }

    fn key(&self, key: &str) -> String {
        self.client.config().prefixed(key)
    }

    fn ttl(&self, ttl_seconds: Option<u64>) -> Option<u64> {
        self.client.config().effective_ttl(ttl_seconds)
    }
}

#[async_trait]
impl CacheService for RedisCacheService {
    async fn set(&self, key: &str, value: String, ttl_seconds: Option<u64>) -> DomainResult<()> {
        let key = self.key(key);
        match self.ttl(ttl_seconds) {
            // An entry that is already expired must not be observable
            Some(0) => {
                self.client.delete(&key).await?;
            }
            Some(ttl) => self.client.set_with_expiry(&key, &value, ttl).await?,
            None => self.client.set(&key, &value).await?,
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.client.get(&self.key(key)).await?)
    }

    async fn delete(&self, key: &str) -> DomainResult<()> {
        self.client.delete(&self.key(key)).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        Ok(self.client.exists(&self.key(key)).await?)
    }

    async fn get_ttl(&self, key: &str) -> DomainResult<Option<u64>> {
        Ok(self.client.ttl(&self.key(key)).await?)
    }

    async fn increment(&self, key: &str, ttl_seconds: Option<u64>) -> DomainResult<i64> {
        let key = self.key(key);
        Ok(self
            .client
            .increment_with_ttl(&key, self.ttl(ttl_seconds))
            .await?)
    }
}
