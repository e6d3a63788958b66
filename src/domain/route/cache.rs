//! Route cache trait definition

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;

use super::key::RouteKey;
use crate::domain::coordinate::Coordinate;
use crate::domain::DomainError;

/// A resolved path and the moment it was stored
#[derive(Debug, Clone, PartialEq)]
pub struct CachedRoute {
    pub path: Vec<Coordinate>,
    pub inserted_at: Instant,
}

impl CachedRoute {
    pub fn new(path: Vec<Coordinate>) -> Self {
        Self {
            path,
            inserted_at: Instant::now(),
        }
    }

    /// Entries are valid while `now - inserted_at < ttl`
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

/// Cache of resolved stop-to-stop paths with time-based expiry
///
/// Implementations must never return an expired entry from [`RouteCache::get`].
#[async_trait]
pub trait RouteCache: Send + Sync + Debug {
    /// Gets a live entry; expired entries behave as a miss
    async fn get(&self, key: &RouteKey) -> Result<Option<CachedRoute>, DomainError>;

    /// Stores a path stamped with the current time, replacing any prior entry
    async fn put(&self, key: &RouteKey, path: Vec<Coordinate>) -> Result<(), DomainError>;

    /// Removes an entry unconditionally
    async fn evict(&self, key: &RouteKey) -> Result<bool, DomainError>;

    /// Removes every expired entry, returning how many were dropped
    async fn purge_expired(&self) -> Result<usize, DomainError>;

    /// Approximate number of stored entries
    async fn len(&self) -> Result<usize, DomainError>;

    /// Removes all entries
    async fn clear(&self) -> Result<(), DomainError>;

    /// Time-to-live applied to entries
    fn ttl(&self) -> Duration;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// HashMap-backed cache for tests, with an optional injected failure
    #[derive(Debug)]
    pub struct MockRouteCache {
        entries: Mutex<HashMap<String, CachedRoute>>,
        ttl: Duration,
        error: Mutex<Option<String>>,
    }

    impl MockRouteCache {
        pub fn new(ttl: Duration) -> Self {
            Self {
                entries: Mutex::new(HashMap::new()),
                ttl,
                error: Mutex::new(None),
            }
        }

        pub fn with_error(self, error: impl Into<String>) -> Self {
            *self.error.lock().unwrap() = Some(error.into());
            self
        }

        pub fn contains(&self, key: &RouteKey) -> bool {
            self.entries.lock().unwrap().contains_key(key.as_str())
        }

        fn check_error(&self) -> Result<(), DomainError> {
            if let Some(error) = self.error.lock().unwrap().clone() {
                return Err(DomainError::cache(error));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RouteCache for MockRouteCache {
        async fn get(&self, key: &RouteKey) -> Result<Option<CachedRoute>, DomainError> {
            self.check_error()?;
            let mut entries = self.entries.lock().unwrap();

            match entries.get(key.as_str()) {
                Some(entry) if entry.is_expired(self.ttl) => {
                    entries.remove(key.as_str());
                    Ok(None)
                }
                Some(entry) => Ok(Some(entry.clone())),
                None => Ok(None),
            }
        }

        async fn put(&self, key: &RouteKey, path: Vec<Coordinate>) -> Result<(), DomainError> {
            self.check_error()?;
            self.entries
                .lock()
                .unwrap()
                .insert(key.as_str().to_string(), CachedRoute::new(path));
            Ok(())
        }

        async fn evict(&self, key: &RouteKey) -> Result<bool, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().remove(key.as_str()).is_some())
        }

        async fn purge_expired(&self) -> Result<usize, DomainError> {
            self.check_error()?;
            let mut entries = self.entries.lock().unwrap();
            let before = entries.len();
            entries.retain(|_, entry| !entry.is_expired(self.ttl));
            Ok(before - entries.len())
        }

        async fn len(&self) -> Result<usize, DomainError> {
            self.check_error()?;
            Ok(self.entries.lock().unwrap().len())
        }

        async fn clear(&self) -> Result<(), DomainError> {
            self.check_error()?;
            self.entries.lock().unwrap().clear();
            Ok(())
        }

        fn ttl(&self) -> Duration {
            self.ttl
        }
    }
}
