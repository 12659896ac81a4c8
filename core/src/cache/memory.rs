//! Process-local cache backed by a locked hash map

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::debug;

use crate::errors::{DomainError, DomainResult};

use super::traits::CacheService;

/// A stored value and its optional deadline
#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: String, ttl_seconds: Option<u64>) -> Self {
        Self {
            value,
            expires_at: ttl_seconds.map(|ttl| Instant::now() + Duration::from_secs(ttl)),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(deadline) if deadline <= now)
    }
}

/// In-memory [`CacheService`]
///
/// Expired entries are evicted lazily by the read that finds them, or in bulk
/// by [`MemoryCacheService::purge_expired`]. Time is read through
/// `tokio::time`, so paused-clock tests can advance it.
#[derive(Debug, Default)]
pub struct MemoryCacheService {
    entries: RwLock<HashMap<String, CacheEntry>>,
    default_ttl: Option<u64>,
}

impl MemoryCacheService {
    /// Create an empty cache whose entries never expire unless asked to
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache applying `ttl_seconds` to writes that name no TTL
    pub fn with_default_ttl(ttl_seconds: u64) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl: Some(ttl_seconds),
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "Purged expired cache entries");
        }
        purged
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// True when nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Look up a live entry, evicting it if it has expired
    async fn live_entry(&self, key: &str) -> Option<CacheEntry> {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired(now) => return Some(entry.clone()),
                Some(_) => {}
            }
        }

        let mut entries = self.entries.write().await;
        // Re-check under the write lock; a writer may have replaced the entry
        if entries.get(key).is_some_and(|entry| entry.is_expired(now)) {
            entries.remove(key);
            debug!(key = key, "Evicted expired cache entry");
        }
        entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .cloned()
    }
}

/// Whole seconds left before `deadline`, rounded up
fn seconds_until(deadline: Instant, now: Instant) -> u64 {
    let remaining = deadline.saturating_duration_since(now);
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

#[async_trait]
impl CacheService for MemoryCacheService {
    async fn set(&self, key: &str, value: String, ttl_seconds: Option<u64>) -> DomainResult<()> {
        let ttl_seconds = ttl_seconds.or(self.default_ttl);
        let mut entries = self.entries.write().await;
        if ttl_seconds == Some(0) {
            entries.remove(key);
            return Ok(());
        }
        entries.insert(key.to_string(), CacheEntry::new(value, ttl_seconds));
        Ok(())
    }

    async fn get(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.live_entry(key).await.map(|entry| entry.value))
    }

    async fn delete(&self, key: &str) -> DomainResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn exists(&self, key: &str) -> DomainResult<bool> {
        Ok(self.live_entry(key).await.is_some())
    }

    async fn get_ttl(&self, key: &str) -> DomainResult<Option<u64>> {
        let now = Instant::now();
        Ok(self
            .live_entry(key)
            .await
            .and_then(|entry| entry.expires_at)
            .map(|deadline| seconds_until(deadline, now)))
    }

    async fn increment(&self, key: &str, ttl_seconds: Option<u64>) -> DomainResult<i64> {
        let ttl_seconds = ttl_seconds.or(self.default_ttl);
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let (current, previous_deadline) = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                let count = entry.value.parse::<i64>().map_err(|_| {
                    DomainError::cache(format!("Value at '{}' is not an integer", key))
                })?;
                (count, entry.expires_at)
            }
            _ => (0, None),
        };
        let next = current
            .checked_add(1)
            .ok_or_else(|| DomainError::cache(format!("Counter at '{}' overflowed", key)))?;

        match ttl_seconds {
            Some(0) => {
                entries.remove(key);
            }
            Some(_) => {
                entries.insert(key.to_string(), CacheEntry::new(next.to_string(), ttl_seconds));
            }
            // Without a TTL the counter keeps whatever deadline it already had
            None => {
                entries.insert(
                    key.to_string(),
                    CacheEntry {
                        value: next.to_string(),
                        expires_at: previous_deadline,
                    },
                );
            }
        }
        Ok(next)
    }
}
