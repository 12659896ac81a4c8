//! Redis cache client implementation
//!
//! A thin async wrapper over a multiplexed Redis connection. Idempotent
//! commands are retried on transient transport errors with exponential
//! backoff. The counter primitive runs `INCR` and `EXPIRE` inside one
//! `MULTI/EXEC` block and is sent once.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use redis::{aio::MultiplexedConnection, AsyncCommands, Client, RedisError, RedisResult};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use gk_shared::config::CacheConfig;

use crate::InfrastructureError;

/// Upper bound for the backoff between two retries
const MAX_RETRY_DELAY_MS: u64 = 5000;

type RedisFuture<T> = Pin<Box<dyn Future<Output = RedisResult<T>> + Send>>;

/// Redis cache client with connection multiplexing and retry logic
///
/// Cloning is cheap; clones share the underlying connection.
#[derive(Clone)]
pub struct RedisClient {
    /// Redis multiplexed connection for async operations
    connection: MultiplexedConnection,
    /// Configuration used to create this client
    config: CacheConfig,
}

impl RedisClient {
    /// Connect to the Redis server named by `config.url`
    ///
    /// Connection attempts follow the same retry policy as commands:
    /// `config.max_retries` attempts, starting at `config.retry_delay_ms`
    /// and doubling up to five seconds.
    ///
    /// # Errors
    /// * `InfrastructureError::Config` - The URL cannot be parsed
    /// * `InfrastructureError::Cache` - The server stayed unreachable
    pub async fn new(config: CacheConfig) -> Result<Self, InfrastructureError> {
        info!(
            url = %mask_url(&config.url),
            max_retries = config.max_retries,
            "Creating Redis client"
        );

        let client = Client::open(config.url.as_str()).map_err(|e| {
            error!("Failed to parse Redis URL: {}", e);
            InfrastructureError::Config(format!("Invalid Redis URL: {}", e))
        })?;

        let connection =
            Self::connect_with_retry(&client, config.max_retries, config.retry_delay_ms).await?;

        info!("Redis client created successfully");
        Ok(Self { connection, config })
    }

    /// Configuration this client was created with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    async fn connect_with_retry(
        client: &Client,
        max_retries: u32,
        retry_delay_ms: u64,
    ) -> Result<MultiplexedConnection, InfrastructureError> {
        let max_retries = max_retries.max(1);
        let mut attempts = 0;
        let mut delay = retry_delay_ms;

        loop {
            attempts += 1;
            debug!("Attempting to connect to Redis (attempt {})", attempts);

            match client.get_multiplexed_async_connection().await {
                Ok(connection) => {
                    info!("Successfully connected to Redis");
                    return Ok(connection);
                }
                Err(e) if attempts < max_retries => {
                    warn!(
                        "Failed to connect to Redis (attempt {}/{}): {}. Retrying in {}ms...",
                        attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => {
                    error!("Failed to connect to Redis after {} attempts: {}", attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }

    /// `SET key value EX seconds`
    pub async fn set_with_expiry(
        &self,
        key: &str,
        value: &str,
        expiry_seconds: u64,
    ) -> Result<(), InfrastructureError> {
        debug!(key = key, ttl_seconds = expiry_seconds, "Setting key with expiry");
        let (key, value) = (key.to_string(), value.to_string());

        self.execute_with_retry("SET EX", move |mut conn| {
            let (key, value) = (key.clone(), value.clone());
            Box::pin(async move { conn.set_ex::<_, _, ()>(key, value, expiry_seconds).await })
        })
        .await
    }

    /// `SET key value`, clearing any previous expiry
    pub async fn set(&self, key: &str, value: &str) -> Result<(), InfrastructureError> {
        debug!(key = key, "Setting key without expiry");
        let (key, value) = (key.to_string(), value.to_string());

        self.execute_with_retry("SET", move |mut conn| {
            let (key, value) = (key.clone(), value.clone());
            Box::pin(async move { conn.set::<_, _, ()>(key, value).await })
        })
        .await
    }

    /// `GET key`
    pub async fn get(&self, key: &str) -> Result<Option<String>, InfrastructureError> {
        let owned = key.to_string();
        let value = self
            .execute_with_retry("GET", move |mut conn| {
                let key = owned.clone();
                Box::pin(async move { conn.get::<_, Option<String>>(key).await })
            })
            .await?;

        debug!(key = key, hit = value.is_some(), "Fetched key");
        Ok(value)
    }

    /// `DEL key`, returning whether something was removed
    pub async fn delete(&self, key: &str) -> Result<bool, InfrastructureError> {
        let owned = key.to_string();
        let deleted = self
            .execute_with_retry("DEL", move |mut conn| {
                let key = owned.clone();
                Box::pin(async move { conn.del::<_, u32>(key).await })
            })
            .await?;

        debug!(key = key, deleted = deleted > 0, "Deleted key");
        Ok(deleted > 0)
    }

    /// `EXISTS key`
    pub async fn exists(&self, key: &str) -> Result<bool, InfrastructureError> {
        let owned = key.to_string();
        self.execute_with_retry("EXISTS", move |mut conn| {
            let key = owned.clone();
            Box::pin(async move { conn.exists::<_, bool>(key).await })
        })
        .await
    }

    /// Remaining lifetime in whole seconds, rounded up
    ///
    /// Uses `PTTL` so that a key with 1.2 s left reports 2 rather than 1.
    /// Returns `None` when the key is missing or has no expiry.
    pub async fn ttl(&self, key: &str) -> Result<Option<u64>, InfrastructureError> {
        let owned = key.to_string();
        let millis = self
            .execute_with_retry("PTTL", move |mut conn| {
                let key = owned.clone();
                Box::pin(async move { conn.pttl::<_, i64>(key).await })
            })
            .await?;

        // -2: no such key, -1: no expiry
        let ttl = u64::try_from(millis).ok().map(|ms| ms.div_ceil(1000));
        debug!(key = key, ttl_seconds = ?ttl, "Fetched TTL");
        Ok(ttl)
    }

    /// Atomically increment a counter and apply its TTL
    ///
    /// * `Some(ttl)` - `INCR` and `EXPIRE` run in one transaction
    /// * `Some(0)` - the counter is incremented and dropped in one transaction
    /// * `None` - plain `INCR`; an existing expiry is left untouched
    ///
    /// `INCR` is not idempotent: a retry after a lost reply would count
    /// twice, so this command is sent exactly once.
    pub async fn increment_with_ttl(
        &self,
        key: &str,
        ttl_seconds: Option<u64>,
    ) -> Result<i64, InfrastructureError> {
        let owned = key.to_string();
        let count = self
            .execute_once("INCR", move |mut conn| {
                let key = owned.clone();
                Box::pin(async move {
                    let mut pipe = redis::pipe();
                    pipe.atomic().incr(&key, 1);
                    match ttl_seconds {
                        Some(0) => {
                            pipe.del(&key).ignore();
                        }
                        Some(ttl) => {
                            pipe.expire(&key, expire_seconds(ttl)).ignore();
                        }
                        None => {}
                    }
                    let (count,): (i64,) = pipe.query_async(&mut conn).await?;
                    Ok(count)
                })
            })
            .await?;

        debug!(key = key, count = count, "Incremented counter");
        Ok(count)
    }

    /// Check that the server answers `PING`
    pub async fn health_check(&self) -> Result<bool, InfrastructureError> {
        let response = self
            .execute_with_retry("PING", |mut conn| {
                Box::pin(async move { redis::cmd("PING").query_async::<_, String>(&mut conn).await })
            })
            .await?;

        if response == "PONG" {
            debug!("Redis health check passed");
            Ok(true)
        } else {
            warn!("Redis health check returned unexpected response: {}", response);
            Ok(false)
        }
    }

    /// Run an idempotent command, retrying transient failures with exponential backoff
    async fn execute_with_retry<F, T>(
        &self,
        command: &'static str,
        operation: F,
    ) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let budget = attempt_budget(self.config.max_retries, true);
        self.execute(command, budget, operation).await
    }

    /// Run a command that must not be repeated
    async fn execute_once<F, T>(
        &self,
        command: &'static str,
        operation: F,
    ) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let budget = attempt_budget(self.config.max_retries, false);
        self.execute(command, budget, operation).await
    }

    async fn execute<F, T>(
        &self,
        command: &'static str,
        max_retries: u32,
        operation: F,
    ) -> Result<T, InfrastructureError>
    where
        F: Fn(MultiplexedConnection) -> RedisFuture<T>,
    {
        let mut attempts = 0;
        let mut delay = self.config.retry_delay_ms;

        loop {
            attempts += 1;

            match operation(self.connection.clone()).await {
                Ok(result) => return Ok(result),
                Err(e) if attempts < max_retries && is_retriable_error(&e) => {
                    warn!(
                        "Redis {} failed (attempt {}/{}): {}. Retrying in {}ms...",
                        command, attempts, max_retries, e, delay
                    );
                    sleep(Duration::from_millis(delay)).await;
                    delay = next_delay(delay);
                }
                Err(e) => {
                    error!("Redis {} failed after {} attempts: {}", command, attempts, e);
                    return Err(InfrastructureError::Cache(e));
                }
            }
        }
    }
}

/// Number of times a command may be sent
pub(crate) fn attempt_budget(max_retries: u32, idempotent: bool) -> u32 {
    if idempotent {
        max_retries.max(1)
    } else {
        1
    }
}

/// `EXPIRE` takes a signed count; saturate instead of wrapping
pub(crate) fn expire_seconds(ttl_seconds: u64) -> i64 {
    i64::try_from(ttl_seconds).unwrap_or(i64::MAX)
}

/// Double the delay, capped at five seconds
pub(crate) fn next_delay(delay_ms: u64) -> u64 {
    delay_ms.saturating_mul(2).min(MAX_RETRY_DELAY_MS)
}

/// Whether an error is transient and the command worth repeating
pub(crate) fn is_retriable_error(error: &RedisError) -> bool {
    matches!(
        error.kind(),
        redis::ErrorKind::IoError
            | redis::ErrorKind::ClientError
            | redis::ErrorKind::BusyLoadingError
            | redis::ErrorKind::TryAgain
    )
}

/// Hide credentials in a Redis URL before logging it
pub(crate) fn mask_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(proto_end), Some(at_pos)) if at_pos > proto_end => {
            format!("{}****{}", &url[..proto_end + 3], &url[at_pos..])
        }
        _ => url.to_string(),
    }
}
