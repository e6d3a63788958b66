//! Periodic purge of expired route entries

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::domain::route::RouteCache;
use crate::infrastructure::observability::record_cache_evictions;

/// Spawns a task that purges expired entries every `interval`
///
/// The task only touches the cache, never the request queue, and runs until
/// the returned handle is aborted.
pub fn spawn_cache_sweeper(cache: Arc<dyn RouteCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // The first tick completes immediately.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match cache.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => {
                    record_cache_evictions(purged);
                    debug!(purged, "Swept expired route entries");
                }
                Err(e) => warn!(error = %e, "Route cache sweep failed"),
            }
        }
    })
}
