//! Route and distance endpoints

use axum::extract::{rejection::QueryRejection, Query, State};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{
    ApiError, DistanceRequest, DistanceResponse, Json, RouteQuery, RouteResponse, StopsPathRequest,
};
use crate::domain::{normalize, Coordinate};

fn route_response(state: &AppState, coordinates: Vec<Coordinate>) -> RouteResponse {
    let distance_km = state.route_service.calculate_distance(&coordinates);

    RouteResponse {
        coordinates,
        distance_km,
        distance: state.route_service.format_distance(distance_km),
    }
}

/// GET /v1/route - Path between two points
pub async fn get_route(
    State(state): State<AppState>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<RouteResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::bad_request(e.body_text()))?;
    debug!(start = %query.start, end = %query.end, "Route requested");

    let coordinates = state
        .route_service
        .get_route_coordinates(query.start.as_str(), query.end.as_str())
        .await?;

    Ok(Json(route_response(&state, coordinates)))
}

/// POST /v1/route/stops - Path through an ordered list of stops
pub async fn get_stops_path(
    State(state): State<AppState>,
    Json(request): Json<StopsPathRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    debug!(stops = request.stops.len(), "Stops path requested");

    let coordinates = state.route_service.get_stops_path(request.stops).await?;

    Ok(Json(route_response(&state, coordinates)))
}

/// POST /v1/distance - Haversine length of a path
pub async fn calculate_distance(
    State(state): State<AppState>,
    Json(request): Json<DistanceRequest>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let path = request
        .coordinates
        .into_iter()
        .map(normalize)
        .collect::<Result<Vec<_>, _>>()?;

    let distance_km = state.route_service.calculate_distance(&path);

    Ok(Json(DistanceResponse {
        distance_km,
        distance: state.route_service.format_distance(distance_km),
    }))
}
