//! Infrastructure services

mod route_service;

pub use route_service::{RouteCacheStats, RouteService, RouteServiceConfig};
