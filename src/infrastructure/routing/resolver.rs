//! Route resolver - one provider call with straight-line fallback

use std::sync::Arc;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::domain::coordinate::Coordinate;
use crate::domain::route::{ResolvedRoute, RouteProvider};
use crate::infrastructure::observability::record_route_resolution;

/// Resolves one segment through a [`RouteProvider`]
///
/// Any provider failure degrades to the direct segment `[start, end]`; the
/// caller always receives a drawable path. Failed lookups are not retried.
#[derive(Clone)]
pub struct RouteResolver {
    provider: Arc<dyn RouteProvider>,
}

impl std::fmt::Debug for RouteResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteResolver")
            .field("provider", &self.provider.name())
            .finish()
    }
}

impl RouteResolver {
    pub fn new(provider: Arc<dyn RouteProvider>) -> Self {
        Self { provider }
    }

    pub async fn resolve(&self, start: Coordinate, end: Coordinate) -> ResolvedRoute {
        let started = Instant::now();
        let provider = self.provider.name();

        let resolved = match self.provider.fetch_route(start, end).await {
            Ok(path) => {
                debug!(provider, %start, %end, points = path.len(), "Route resolved");
                ResolvedRoute::road(path)
            }
            Err(e) => {
                warn!(provider, %start, %end, error = %e, "Route lookup failed, using straight line");
                ResolvedRoute::fallback(start, end)
            }
        };

        record_route_resolution(provider, resolved.source, started.elapsed());
        resolved
    }
}
