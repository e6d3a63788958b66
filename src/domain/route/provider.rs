//! Routing provider trait and resolution outcome

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::coordinate::Coordinate;
use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// External road-routing service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RouteProvider: Send + Sync {
    /// Provider name used in logs and metrics
    fn name(&self) -> &'static str;

    /// Fetches the full road geometry from `start` to `end` as (lat, lng) points
    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Vec<Coordinate>, DomainError>;
}

/// Where a resolved path came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteSource {
    /// Road geometry from the provider
    Road,
    /// Straight segment substituted for a failed or skipped lookup
    Fallback,
}

impl RouteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Road => "road",
            Self::Fallback => "fallback",
        }
    }
}

impl std::fmt::Display for RouteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A path together with its source
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRoute {
    pub path: Vec<Coordinate>,
    pub source: RouteSource,
}

impl ResolvedRoute {
    pub fn road(path: Vec<Coordinate>) -> Self {
        Self {
            path,
            source: RouteSource::Road,
        }
    }

    /// Direct two-point segment between the endpoints
    pub fn fallback(start: Coordinate, end: Coordinate) -> Self {
        Self {
            path: vec![start, end],
            source: RouteSource::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == RouteSource::Fallback
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// One observed provider call
    #[derive(Debug, Clone, Copy)]
    pub struct ProviderCall {
        pub start: Coordinate,
        pub end: Coordinate,
        pub at: Instant,
    }

    /// Provider that records every call, optionally failing or taking time
    #[derive(Debug, Default)]
    pub struct RecordingRouteProvider {
        calls: Mutex<Vec<ProviderCall>>,
        in_flight: Mutex<(usize, usize)>,
        fail: bool,
        latency: Duration,
    }

    impl RecordingRouteProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        pub fn with_latency(mut self, latency: Duration) -> Self {
            self.latency = latency;
            self
        }

        pub fn calls(&self) -> Vec<ProviderCall> {
            self.calls.lock().unwrap().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        /// Highest number of calls observed in flight at once
        pub fn max_in_flight(&self) -> usize {
            self.in_flight.lock().unwrap().1
        }

        /// Road path the provider returns for a segment
        pub fn road_path(start: Coordinate, end: Coordinate) -> Vec<Coordinate> {
            let mid = Coordinate::new(
                (start.lat() + end.lat()) / 2.0,
                (start.lng() + end.lng()) / 2.0,
            )
            .unwrap();
            vec![start, mid, end]
        }
    }

    #[async_trait]
    impl RouteProvider for RecordingRouteProvider {
        fn name(&self) -> &'static str {
            "recording"
        }

        async fn fetch_route(
            &self,
            start: Coordinate,
            end: Coordinate,
        ) -> Result<Vec<Coordinate>, DomainError> {
            self.calls.lock().unwrap().push(ProviderCall {
                start,
                end,
                at: Instant::now(),
            });

            {
                let mut in_flight = self.in_flight.lock().unwrap();
                in_flight.0 += 1;
                in_flight.1 = in_flight.1.max(in_flight.0);
            }

            if !self.latency.is_zero() {
                tokio::time::sleep(self.latency).await;
            }

            self.in_flight.lock().unwrap().0 -= 1;

            if self.fail {
                return Err(DomainError::provider("recording", "HTTP 503 Service Unavailable"));
            }

            Ok(Self::road_path(start, end))
        }
    }
}
