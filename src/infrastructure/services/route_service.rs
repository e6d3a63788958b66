//! Route resolution service
//!
//! Public entry point for path lookups: normalizes both ends, serves cached
//! segments and sends misses through the configured admission policy.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, RoutingSettings};
use crate::domain::coordinate::{normalize, Coordinate, CoordinateInput};
use crate::domain::distance;
use crate::domain::route::{KeyStrategy, RouteCache, RouteKey, RouteProvider};
use crate::domain::DomainError;
use crate::infrastructure::cache::{
    spawn_cache_sweeper, InMemoryRouteCache, InMemoryRouteCacheConfig,
};
use crate::infrastructure::observability::record_cache_lookup;
use crate::infrastructure::routing::{
    ImmediateThrottler, OsrmConfig, OsrmProvider, RequestThrottler, RouteAdmission,
    RouteResolver, ThrottleConfig, ThrottlePolicy,
};

/// Behavior knobs for a [`RouteService`]
#[derive(Debug, Clone)]
pub struct RouteServiceConfig {
    pub policy: ThrottlePolicy,
    pub key_strategy: KeyStrategy,
    pub min_interval: Duration,
    pub cache_fallbacks: bool,
    /// Upper bound on stops in one [`RouteService::get_stops_path`] call
    pub max_stops: usize,
}

impl Default for RouteServiceConfig {
    fn default() -> Self {
        Self {
            policy: ThrottlePolicy::default(),
            key_strategy: KeyStrategy::default(),
            min_interval: Duration::from_millis(1000),
            cache_fallbacks: true,
            max_stops: 25,
        }
    }
}

impl RouteServiceConfig {
    pub fn with_policy(mut self, policy: ThrottlePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_key_strategy(mut self, key_strategy: KeyStrategy) -> Self {
        self.key_strategy = key_strategy;
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_max_stops(mut self, max_stops: usize) -> Self {
        self.max_stops = max_stops;
        self
    }
}

impl From<&RoutingSettings> for RouteServiceConfig {
    fn from(settings: &RoutingSettings) -> Self {
        Self {
            policy: settings.policy,
            key_strategy: settings.key_strategy,
            min_interval: settings.min_interval(),
            cache_fallbacks: settings.cache_fallbacks,
            max_stops: settings.max_stops,
        }
    }
}

/// Snapshot of the route cache and queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteCacheStats {
    pub entries: usize,
    pub ttl_secs: u64,
    pub queued: usize,
}

/// Resolves stop-to-stop paths with caching and throttled provider access
///
/// One instance owns one cache and one queue; every caller sharing the
/// instance shares both.
#[derive(Debug)]
pub struct RouteService {
    cache: Arc<dyn RouteCache>,
    admission: Arc<dyn RouteAdmission>,
    key_strategy: KeyStrategy,
    max_stops: usize,
}

impl RouteService {
    pub fn new(
        provider: Arc<dyn RouteProvider>,
        cache: Arc<dyn RouteCache>,
        config: RouteServiceConfig,
    ) -> Self {
        let resolver = RouteResolver::new(provider);

        let admission: Arc<dyn RouteAdmission> = match config.policy {
            ThrottlePolicy::Queue => Arc::new(RequestThrottler::new(
                resolver,
                cache.clone(),
                ThrottleConfig::default()
                    .with_min_interval(config.min_interval)
                    .with_cache_fallbacks(config.cache_fallbacks),
            )),
            ThrottlePolicy::Immediate => Arc::new(ImmediateThrottler::new(
                resolver,
                cache.clone(),
                config.min_interval,
            )),
        };

        Self {
            cache,
            admission,
            key_strategy: config.key_strategy,
            max_stops: config.max_stops,
        }
    }

    /// Builds the OSRM-backed service described by the application config
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let routing = &config.routing;

        let provider = OsrmProvider::new(
            OsrmConfig {
                profile: routing.profile.clone(),
                ..OsrmConfig::default()
            }
            .with_base_url(routing.base_url.clone())
            .with_user_agent(routing.user_agent.clone())
            .with_timeout(routing.request_timeout()),
        )?;

        let cache = InMemoryRouteCache::with_config(
            InMemoryRouteCacheConfig::default()
                .with_max_capacity(config.cache.max_capacity)
                .with_ttl(config.cache.ttl()),
        );

        info!(
            base_url = %routing.base_url,
            policy = %routing.policy,
            min_interval_ms = routing.min_interval_ms,
            ttl_secs = config.cache.ttl_secs,
            "Route service configured"
        );

        Ok(Self::new(
            Arc::new(provider),
            Arc::new(cache),
            RouteServiceConfig::from(routing),
        ))
    }

    /// Returns a drawable path from `start` to `end`
    ///
    /// Fails only when an endpoint is not a valid coordinate; provider
    /// failures come back as the straight segment `[start, end]`.
    pub async fn get_route_coordinates(
        &self,
        start: impl Into<CoordinateInput>,
        end: impl Into<CoordinateInput>,
    ) -> Result<Vec<Coordinate>, DomainError> {
        let start = normalize(start)?;
        let end = normalize(end)?;

        Ok(self.route_between(start, end).await)
    }

    async fn route_between(&self, start: Coordinate, end: Coordinate) -> Vec<Coordinate> {
        let key = RouteKey::with_strategy(start, end, self.key_strategy);

        match self.cache.get(&key).await {
            Ok(Some(entry)) => {
                debug!(key = %key, "Route cache hit");
                record_cache_lookup(true);
                return key.orient(entry.path);
            }
            Ok(None) => debug!(key = %key, "Route cache miss"),
            Err(e) => warn!(key = %key, error = %e, "Route cache read failed, treating as miss"),
        }

        record_cache_lookup(false);
        self.admission.admit(key).await
    }

    /// Resolves every consecutive pair of stops and joins the segments
    ///
    /// All segments are scheduled together, so the throttler serves them in
    /// stop order. The shared point between two segments appears once.
    /// More than `max_stops` stops is a validation error.
    pub async fn get_stops_path<I, T>(&self, stops: I) -> Result<Vec<Coordinate>, DomainError>
    where
        I: IntoIterator<Item = T>,
        T: Into<CoordinateInput>,
    {
        let stops = stops
            .into_iter()
            .map(normalize)
            .collect::<Result<Vec<_>, _>>()?;

        if stops.len() > self.max_stops {
            return Err(DomainError::validation(format!(
                "{} stops exceed the limit of {}",
                stops.len(),
                self.max_stops
            )));
        }

        if stops.len() < 2 {
            return Ok(stops);
        }

        let segments = join_all(
            stops
                .windows(2)
                .map(|pair| self.route_between(pair[0], pair[1])),
        )
        .await;

        let mut path = Vec::new();

        for segment in segments {
            let skip = usize::from(path.last().is_some_and(|last| segment.first() == Some(last)));
            path.extend(segment.into_iter().skip(skip));
        }

        Ok(path)
    }

    /// Total haversine length of `path` in kilometers
    pub fn calculate_distance(&self, path: &[Coordinate]) -> f64 {
        distance::calculate_distance(path)
    }

    pub fn format_distance(&self, kilometers: f64) -> String {
        distance::format_distance(kilometers)
    }

    pub async fn cache_stats(&self) -> Result<RouteCacheStats, DomainError> {
        Ok(RouteCacheStats {
            entries: self.cache.len().await?,
            ttl_secs: self.cache.ttl().as_secs(),
            queued: self.admission.pending(),
        })
    }

    /// Drops every cached segment; queued requests are still served
    pub async fn clear_cache(&self) -> Result<(), DomainError> {
        self.cache.clear().await?;
        info!("Route cache cleared");
        Ok(())
    }

    /// Starts the periodic purge of expired segments
    pub fn spawn_cache_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        spawn_cache_sweeper(self.cache.clone(), interval)
    }
}
