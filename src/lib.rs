//! Bus Route Resolver
//!
//! Road paths between bus stops for the tracker map, with:
//! - Coordinate normalization for `"lat,lng"` strings and numeric pairs
//! - A TTL cache of resolved segments
//! - A FIFO throttler that spaces calls to the OSRM routing service
//! - Straight-line fallback when routing fails
//! - Haversine path length and display formatting

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{Coordinate, CoordinateInput, DomainError};
pub use infrastructure::services::{RouteService, RouteServiceConfig};
