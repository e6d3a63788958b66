//! Immediate-fallback admission
//!
//! A cache miss that arrives within `min_interval` of the previous provider
//! call is answered with a straight line right away instead of waiting.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::warn;

use super::admission::RouteAdmission;
use super::resolver::RouteResolver;
use crate::domain::coordinate::Coordinate;
use crate::domain::route::{RouteCache, RouteKey, RouteSource};

pub struct ImmediateThrottler {
    resolver: RouteResolver,
    cache: Arc<dyn RouteCache>,
    min_interval: Duration,
    last_request: Mutex<Option<Instant>>,
}

impl std::fmt::Debug for ImmediateThrottler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImmediateThrottler")
            .field("resolver", &self.resolver)
            .field("min_interval", &self.min_interval)
            .finish()
    }
}

impl ImmediateThrottler {
    pub fn new(resolver: RouteResolver, cache: Arc<dyn RouteCache>, min_interval: Duration) -> Self {
        Self {
            resolver,
            cache,
            min_interval,
            last_request: Mutex::new(None),
        }
    }

    /// Claims the provider slot if `min_interval` has passed since the last claim
    fn try_acquire(&self) -> bool {
        let mut last = self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let now = Instant::now();

        match *last {
            Some(previous) if now.duration_since(previous) < self.min_interval => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }
}

#[async_trait]
impl RouteAdmission for ImmediateThrottler {
    async fn admit(&self, key: RouteKey) -> Vec<Coordinate> {
        if !self.try_acquire() {
            warn!(key = %key, "Rate limiting active, using straight line");
            return key.fallback_path();
        }

        let resolved = self.resolver.resolve(key.origin(), key.destination()).await;

        // Only road paths are worth keeping; a fallback is retried next time.
        if resolved.source == RouteSource::Road {
            if let Err(e) = self.cache.put(&key, resolved.path.clone()).await {
                warn!(key = %key, error = %e, "Route cache write failed");
            }
        }

        key.orient(resolved.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::route::{MockRouteCache, RecordingRouteProvider};

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn key(n: u32) -> RouteKey {
        let n = n as f64;
        RouteKey::new(coord(n, n), coord(n + 0.5, n + 0.5))
    }

    fn setup(
        provider: RecordingRouteProvider,
    ) -> (ImmediateThrottler, Arc<RecordingRouteProvider>, Arc<MockRouteCache>) {
        let provider = Arc::new(provider);
        let cache = Arc::new(MockRouteCache::new(Duration::from_secs(300)));
        let throttler = ImmediateThrottler::new(
            RouteResolver::new(provider.clone()),
            cache.clone(),
            Duration::from_millis(1000),
        );
        (throttler, provider, cache)
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_request_too_soon_gets_straight_line() {
        let (throttler, provider, cache) = setup(RecordingRouteProvider::new());

        let first = throttler.admit(key(1)).await;
        let second = throttler.admit(key(2)).await;

        assert_eq!(first.len(), 3);
        assert_eq!(second, key(2).fallback_path());
        assert_eq!(provider.call_count(), 1);
        assert!(cache.contains(&key(1)));
        assert!(!cache.contains(&key(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_after_interval_reaches_provider() {
        let (throttler, provider, _) = setup(RecordingRouteProvider::new());

        throttler.admit(key(1)).await;
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let second = throttler.admit(key(2)).await;

        assert_eq!(second.len(), 3);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_provider_failure_not_cached() {
        let (throttler, _, cache) = setup(RecordingRouteProvider::failing());

        let path = throttler.admit(key(1)).await;

        assert_eq!(path, key(1).fallback_path());
        assert!(!cache.contains(&key(1)));
    }
}
