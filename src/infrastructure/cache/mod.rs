//! Cache infrastructure - Route cache implementations

mod in_memory;
mod sweeper;

pub use in_memory::{InMemoryRouteCache, InMemoryRouteCacheConfig};
pub use sweeper::spawn_cache_sweeper;
