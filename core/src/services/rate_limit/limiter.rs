//! Progressive rate limiter backed by the cache

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use gk_shared::RateLimitConfig;

use crate::cache::{CacheService, Sha256KeyGenerator};
use crate::errors::{DomainError, DomainResult};

/// Prefix of the per-identifier attempt counter
pub const ATTEMPT_KEY_PREFIX: &str = "rate-limit:attempt:";
/// Prefix of the per-identifier block marker
pub const BLOCK_KEY_PREFIX: &str = "rate-limit:block:";
/// Prefix of the per-identifier violation history
pub const VIOLATION_KEY_PREFIX: &str = "rate-limit:violations:";
/// Violation history is kept for 30 days
pub const VIOLATION_TTL_SECONDS: u64 = 60 * 60 * 24 * 30;
/// Upper bound of the block duration multiplier
pub const MAX_BLOCK_MULTIPLIER: u64 = 32;

/// Outcome of a non-mutating rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitStatus {
    Allowed,
    Blocked { retry_after_seconds: u64 },
}

impl RateLimitStatus {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitStatus::Allowed)
    }
}

/// Rate limiting contract used by the authentication flow
#[async_trait]
pub trait RateLimiterTrait: Send + Sync {
    /// Count an attempt; `false` means the caller must be refused
    async fn record_attempt(&self, identifier: &str) -> DomainResult<bool>;

    /// Forget the attempts of an identifier after a successful check
    async fn reset_attempts(&self, identifier: &str) -> DomainResult<()>;

    /// Check whether an identifier is currently blocked
    async fn is_blocked(&self, identifier: &str) -> DomainResult<bool>;

    /// Seconds until the block lifts, 0 when not blocked
    async fn get_block_time_remaining(&self, identifier: &str) -> DomainResult<u64>;
}

/// Rate limiter whose blocks grow with each repeated violation
pub struct ProgressiveRateLimiter {
    cache: Arc<dyn CacheService>,
    config: RateLimitConfig,
}

impl ProgressiveRateLimiter {
    /// Create a new rate limiter
    pub fn new(cache: Arc<dyn CacheService>, config: RateLimitConfig) -> Self {
        Self { cache, config }
    }

    /// Active configuration
    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Report whether an identifier may attempt, without counting an attempt
    pub async fn check(&self, identifier: &str) -> DomainResult<RateLimitStatus> {
        match self.block_ttl(identifier).await? {
            Some(retry_after_seconds) => Ok(RateLimitStatus::Blocked { retry_after_seconds }),
            None => Ok(RateLimitStatus::Allowed),
        }
    }

    /// Number of blocks imposed on an identifier in the last 30 days
    pub async fn violation_count(&self, identifier: &str) -> DomainResult<u64> {
        self.read_counter(&violation_key(identifier)).await
    }

    /// Block duration for an identifier with `violations` prior blocks
    pub fn block_duration_for(&self, violations: u64) -> u64 {
        let multiplier = if violations >= 5 {
            MAX_BLOCK_MULTIPLIER
        } else {
            (1u64 << violations).min(MAX_BLOCK_MULTIPLIER)
        };
        self.config.block_duration_seconds.saturating_mul(multiplier)
    }

    /// Impose a block and record the violation exactly once
    async fn block_identifier(&self, identifier: &str) -> DomainResult<u64> {
        let violation_key = violation_key(identifier);
        let violations = self.read_counter(&violation_key).await?;
        let duration = self.block_duration_for(violations);

        self.cache
            .set(&block_key(identifier), "true".to_string(), Some(duration))
            .await?;
        // The window restarts once the block lifts
        self.cache.delete(&attempt_key(identifier)).await?;
        self.cache
            .increment(&violation_key, Some(VIOLATION_TTL_SECONDS))
            .await?;

        warn!(
            identifier_hash = %log_id(identifier),
            block_seconds = duration,
            violations = violations + 1,
            "Rate limit exceeded, identifier blocked"
        );
        Ok(duration)
    }

    /// TTL of the block marker; a block without expiry reports 0 seconds
    async fn block_ttl(&self, identifier: &str) -> DomainResult<Option<u64>> {
        let key = block_key(identifier);
        if !self.cache.exists(&key).await? {
            return Ok(None);
        }
        Ok(Some(self.cache.get_ttl(&key).await?.unwrap_or(0)))
    }

    async fn read_counter(&self, key: &str) -> DomainResult<u64> {
        match self.cache.get(key).await? {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| DomainError::Cache {
                message: format!("Counter at '{}' is not a number", key),
            }),
            None => Ok(0),
        }
    }
}

#[async_trait]
impl RateLimiterTrait for ProgressiveRateLimiter {
    async fn record_attempt(&self, identifier: &str) -> DomainResult<bool> {
        if self.is_blocked(identifier).await? {
            warn!(identifier_hash = %log_id(identifier), "Attempt from blocked identifier");
            return Ok(false);
        }

        let attempts = self
            .cache
            .increment(&attempt_key(identifier), Some(self.config.window_seconds))
            .await?;
        debug!(
            identifier_hash = %log_id(identifier),
            attempts,
            max_attempts = self.config.max_attempts,
            "Recorded attempt"
        );

        // Only the attempt that lands exactly on the limit imposes the block;
        // concurrent attempts past it are refused without another violation
        let limit = i64::from(self.config.max_attempts.max(1));
        if attempts == limit {
            self.block_identifier(identifier).await?;
            return Ok(false);
        }
        if attempts > limit {
            return Ok(false);
        }

        Ok(true)
    }

    async fn reset_attempts(&self, identifier: &str) -> DomainResult<()> {
        self.cache.delete(&attempt_key(identifier)).await?;
        info!(identifier_hash = %log_id(identifier), "Reset attempt counter");
        Ok(())
    }

    async fn is_blocked(&self, identifier: &str) -> DomainResult<bool> {
        self.cache.exists(&block_key(identifier)).await
    }

    async fn get_block_time_remaining(&self, identifier: &str) -> DomainResult<u64> {
        Ok(self.block_ttl(identifier).await?.unwrap_or(0))
    }
}

fn attempt_key(identifier: &str) -> String {
    format!("{}{}", ATTEMPT_KEY_PREFIX, identifier)
}

fn block_key(identifier: &str) -> String {
    format!("{}{}", BLOCK_KEY_PREFIX, identifier)
}

fn violation_key(identifier: &str) -> String {
    format!("{}{}", VIOLATION_KEY_PREFIX, identifier)
}

/// Identifiers may embed a username, so logs only carry a digest prefix
fn log_id(identifier: &str) -> String {
    let mut digest = Sha256KeyGenerator::digest(identifier);
    digest.truncate(16);
    digest
}
