//! v1 API endpoints

pub mod cache;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};

use super::state::AppState;

/// Create v1 API router
pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/route", get(routes::get_route))
        .route("/route/stops", post(routes::get_stops_path))
        .route("/distance", post(routes::calculate_distance))
        .route("/cache", get(cache::cache_stats).delete(cache::clear_cache))
}
