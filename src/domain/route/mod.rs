//! Route domain - segment keys, path cache and routing provider abstractions

mod cache;
mod key;
mod provider;

pub use cache::{CachedRoute, RouteCache};
pub use key::{KeyStrategy, RouteKey};
pub use provider::{ResolvedRoute, RouteProvider, RouteSource};

#[cfg(test)]
pub use cache::mock::MockRouteCache;
#[cfg(test)]
pub use provider::mock::{ProviderCall, RecordingRouteProvider};
#[cfg(test)]
pub use provider::MockRouteProvider;
