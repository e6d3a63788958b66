//! FIFO request throttler
//!
//! Cache misses are queued and drained by a single task that calls the
//! resolver one request at a time and pauses `min_interval` after each call.
//! The drain task exits when the queue is empty and is respawned by the next
//! [`RequestThrottler::schedule`].

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use super::admission::RouteAdmission;
use super::resolver::RouteResolver;
use crate::domain::coordinate::Coordinate;
use crate::domain::route::{RouteCache, RouteKey, RouteSource};
use crate::infrastructure::observability::{record_queue_dedup, set_queue_depth};

/// Throttler settings
#[derive(Debug, Clone)]
pub struct ThrottleConfig {
    /// Minimum spacing between consecutive provider calls
    pub min_interval: Duration,
    /// Whether straight-line fallbacks are cached like road paths
    pub cache_fallbacks: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(1000),
            cache_fallbacks: true,
        }
    }
}

impl ThrottleConfig {
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    pub fn with_cache_fallbacks(mut self, cache_fallbacks: bool) -> Self {
        self.cache_fallbacks = cache_fallbacks;
        self
    }
}

struct PendingRequest {
    key: RouteKey,
    completion: oneshot::Sender<Vec<Coordinate>>,
}

#[derive(Default)]
struct ThrottleState {
    queue: VecDeque<PendingRequest>,
    draining: bool,
}

struct ThrottleShared {
    state: Mutex<ThrottleState>,
    resolver: RouteResolver,
    cache: Arc<dyn RouteCache>,
    config: ThrottleConfig,
}

impl ThrottleShared {
    fn lock_state(&self) -> MutexGuard<'_, ThrottleState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Pops the oldest request, or marks the drain loop finished when empty
    fn next_request(&self) -> Option<PendingRequest> {
        let mut state = self.lock_state();
        let next = state.queue.pop_front();

        if next.is_none() {
            state.draining = false;
        }

        set_queue_depth(state.queue.len());
        next
    }

    async fn cached(&self, key: &RouteKey) -> Option<Vec<Coordinate>> {
        match self.cache.get(key).await {
            Ok(entry) => entry.map(|entry| key.orient(entry.path)),
            Err(e) => {
                warn!(key = %key, error = %e, "Route cache read failed");
                None
            }
        }
    }

    async fn store(&self, key: &RouteKey, path: Vec<Coordinate>) {
        if let Err(e) = self.cache.put(key, path).await {
            warn!(key = %key, error = %e, "Route cache write failed");
        }
    }
}

/// Resets the drain flag if the drain task unwinds, so queued callers get
/// their fallback and the next schedule starts a fresh drain.
struct DrainGuard(Arc<ThrottleShared>);

impl Drop for DrainGuard {
    fn drop(&mut self) {
        if std::thread::panicking() {
            let mut state = self.0.lock_state();
            state.queue.clear();
            state.draining = false;
        }
    }
}

async fn drain(shared: Arc<ThrottleShared>) {
    let _guard = DrainGuard(shared.clone());
    debug!("Route queue drain started");

    while let Some(request) = shared.next_request() {
        // An identical request served earlier in this drain already cached it.
        // The caller's own lookup was already counted as a miss.
        if let Some(path) = shared.cached(&request.key).await {
            record_queue_dedup();
            let _ = request.completion.send(path);
            continue;
        }

        let resolved = shared
            .resolver
            .resolve(request.key.origin(), request.key.destination())
            .await;

        if resolved.source == RouteSource::Road || shared.config.cache_fallbacks {
            shared.store(&request.key, resolved.path.clone()).await;
        }

        if request
            .completion
            .send(request.key.orient(resolved.path))
            .is_err()
        {
            debug!(key = %request.key, "Caller stopped waiting, route kept in cache");
        }

        tokio::time::sleep(shared.config.min_interval).await;
    }

    debug!("Route queue drained");
}

/// Handle to a scheduled route; resolves once the drain loop reaches it
///
/// Never fails: if the drain task is gone the straight segment is returned.
#[must_use = "a pending route does nothing unless awaited"]
pub struct PendingRoute {
    receiver: oneshot::Receiver<Vec<Coordinate>>,
    fallback: Vec<Coordinate>,
}

impl Future for PendingRoute {
    type Output = Vec<Coordinate>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(path)) => Poll::Ready(path),
            Poll::Ready(Err(_)) => {
                warn!("Route drain task ended before answering, using straight line");
                Poll::Ready(std::mem::take(&mut self.fallback))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Serializes provider calls through one FIFO queue
///
/// Guarantees strict arrival-order service, never more than one provider call
/// in flight, and at least `min_interval` between consecutive calls.
#[derive(Clone)]
pub struct RequestThrottler {
    shared: Arc<ThrottleShared>,
}

impl std::fmt::Debug for RequestThrottler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.shared.lock_state();
        f.debug_struct("RequestThrottler")
            .field("queued", &state.queue.len())
            .field("draining", &state.draining)
            .field("config", &self.shared.config)
            .finish()
    }
}

impl RequestThrottler {
    pub fn new(resolver: RouteResolver, cache: Arc<dyn RouteCache>, config: ThrottleConfig) -> Self {
        Self {
            shared: Arc::new(ThrottleShared {
                state: Mutex::new(ThrottleState::default()),
                resolver,
                cache,
                config,
            }),
        }
    }

    /// Queues a segment and returns immediately; must be called within a tokio runtime
    pub fn schedule(&self, key: RouteKey) -> PendingRoute {
        let (completion, receiver) = oneshot::channel();
        let fallback = key.fallback_path();

        let start_drain = {
            let mut state = self.shared.lock_state();
            state.queue.push_back(PendingRequest { key, completion });
            set_queue_depth(state.queue.len());
            !std::mem::replace(&mut state.draining, true)
        };

        if start_drain {
            tokio::spawn(drain(self.shared.clone()));
        }

        PendingRoute { receiver, fallback }
    }

    /// Number of requests waiting in the queue
    pub fn queue_len(&self) -> usize {
        self.shared.lock_state().queue.len()
    }

    /// Whether a drain task is currently running
    pub fn is_draining(&self) -> bool {
        self.shared.lock_state().draining
    }
}

#[async_trait]
impl RouteAdmission for RequestThrottler {
    async fn admit(&self, key: RouteKey) -> Vec<Coordinate> {
        self.schedule(key).await
    }

    fn pending(&self) -> usize {
        self.queue_len()
    }
}
