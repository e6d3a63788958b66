//! Route cache endpoints

use axum::{extract::State, http::StatusCode};

use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::infrastructure::services::RouteCacheStats;

/// GET /v1/cache - Cache size, TTL and queue depth
pub async fn cache_stats(State(state): State<AppState>) -> Result<Json<RouteCacheStats>, ApiError> {
    let stats = state.route_service.cache_stats().await?;
    Ok(Json(stats))
}

/// DELETE /v1/cache - Drop all cached routes
pub async fn clear_cache(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.route_service.clear_cache().await?;
    Ok(StatusCode::NO_CONTENT)
}
