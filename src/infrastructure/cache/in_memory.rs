//! In-memory route cache implementation using moka

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::coordinate::Coordinate;
use crate::domain::route::{CachedRoute, RouteCache, RouteKey};
use crate::domain::DomainError;

/// Configuration for the in-memory route cache
#[derive(Debug, Clone)]
pub struct InMemoryRouteCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
    /// Time-to-live of every entry
    pub ttl: Duration,
}

impl Default for InMemoryRouteCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            ttl: Duration::from_secs(300), // 5 minutes
        }
    }
}

impl InMemoryRouteCacheConfig {
    /// Sets the maximum number of entries
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }

    /// Sets the entry time-to-live
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }
}

/// Thread-safe route cache backed by moka
///
/// Expiry is decided against the tokio clock on every read, so an entry is
/// never served once `ttl` has elapsed. moka's own time-to-live and capacity
/// bound reclaim memory for keys that are never read again.
#[derive(Debug)]
pub struct InMemoryRouteCache {
    cache: MokaCache<String, CachedRoute>,
    config: InMemoryRouteCacheConfig,
}

impl InMemoryRouteCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryRouteCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryRouteCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .time_to_live(config.ttl)
            .build();

        Self { cache, config }
    }
}

impl Default for InMemoryRouteCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RouteCache for InMemoryRouteCache {
    async fn get(&self, key: &RouteKey) -> Result<Option<CachedRoute>, DomainError> {
        match self.cache.get(key.as_str()).await {
            Some(entry) => {
                if entry.is_expired(self.config.ttl) {
                    self.cache.remove(key.as_str()).await;
                    debug!(key = %key, "Dropped expired route entry on read");
                    return Ok(None);
                }

                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, key: &RouteKey, path: Vec<Coordinate>) -> Result<(), DomainError> {
        self.cache
            .insert(key.as_str().to_string(), CachedRoute::new(path))
            .await;
        Ok(())
    }

    async fn evict(&self, key: &RouteKey) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key.as_str()).await.is_some())
    }

    async fn purge_expired(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;

        let expired: Vec<String> = self
            .cache
            .iter()
            .filter(|(_, entry)| entry.is_expired(self.config.ttl))
            .map(|(key, _)| key.as_ref().clone())
            .collect();

        let mut purged = 0;

        for key in expired {
            if self.cache.remove(&key).await.is_some() {
                purged += 1;
            }
        }

        Ok(purged)
    }

    async fn len(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }

    async fn clear(&self) -> Result<(), DomainError> {
        self.cache.invalidate_all();
        self.cache.run_pending_tasks().await;
        Ok(())
    }

    fn ttl(&self) -> Duration {
        self.config.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn key(n: f64) -> RouteKey {
        RouteKey::new(coord(n, n), coord(n + 1.0, n + 1.0))
    }

    fn cache_with_ttl(ttl: Duration) -> InMemoryRouteCache {
        InMemoryRouteCache::with_config(InMemoryRouteCacheConfig::default().with_ttl(ttl))
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = InMemoryRouteCache::new();
        let key = key(1.0);
        let path = vec![coord(1.0, 1.0), coord(1.5, 1.2), coord(2.0, 2.0)];

        cache.put(&key, path.clone()).await.unwrap();

        let entry = cache.get(&key).await.unwrap().unwrap();
        assert_eq!(entry.path, path);
    }

    #[tokio::test]
    async fn test_get_missing() {
        let cache = InMemoryRouteCache::new();
        assert!(cache.get(&key(1.0)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let cache = InMemoryRouteCache::new();
        let key = key(1.0);

        cache.put(&key, key.fallback_path()).await.unwrap();
        let road = vec![coord(1.0, 1.0), coord(1.2, 1.9), coord(2.0, 2.0)];
        cache.put(&key, road.clone()).await.unwrap();

        assert_eq!(cache.get(&key).await.unwrap().unwrap().path, road);
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_not_served_at_ttl() {
        let cache = cache_with_ttl(Duration::from_secs(300));
        let key = key(1.0);

        cache.put(&key, key.fallback_path()).await.unwrap();

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get(&key).await.unwrap().is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_evict() {
        let cache = InMemoryRouteCache::new();
        let key = key(1.0);

        cache.put(&key, key.fallback_path()).await.unwrap();

        assert!(cache.evict(&key).await.unwrap());
        assert!(!cache.evict(&key).await.unwrap());
        assert!(cache.get(&key).await.unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_keeps_live_entries() {
        let cache = cache_with_ttl(Duration::from_secs(60));
        let old = key(1.0);
        let fresh = key(5.0);

        cache.put(&old, old.fallback_path()).await.unwrap();
        tokio::time::advance(Duration::from_secs(45)).await;
        cache.put(&fresh, fresh.fallback_path()).await.unwrap();
        tokio::time::advance(Duration::from_secs(15)).await;

        let purged = cache.purge_expired().await.unwrap();

        assert_eq!(purged, 1);
        assert_eq!(cache.len().await.unwrap(), 1);
        assert!(cache.get(&fresh).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = InMemoryRouteCache::new();

        for n in [1.0, 2.0, 3.0] {
            let key = key(n);
            cache.put(&key, key.fallback_path()).await.unwrap();
        }
        assert_eq!(cache.len().await.unwrap(), 3);

        cache.clear().await.unwrap();
        assert_eq!(cache.len().await.unwrap(), 0);
    }

    #[test]
    fn test_config() {
        let config = InMemoryRouteCacheConfig::default()
            .with_max_capacity(100)
            .with_ttl(Duration::from_secs(1800));

        let cache = InMemoryRouteCache::with_config(config);

        assert_eq!(cache.config.max_capacity, 100);
        assert_eq!(cache.ttl(), Duration::from_secs(1800));
    }
}
