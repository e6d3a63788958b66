//! Domain layer - Core value objects, algorithms and traits

pub mod coordinate;
pub mod distance;
pub mod error;
pub mod route;

pub use coordinate::{normalize, Coordinate, CoordinateInput};
pub use distance::{calculate_distance, format_distance, haversine_km};
pub use error::DomainError;
pub use route::{
    CachedRoute, KeyStrategy, ResolvedRoute, RouteCache, RouteKey, RouteProvider, RouteSource,
};
