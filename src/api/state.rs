//! Application state for shared services

use std::sync::Arc;

use crate::infrastructure::services::RouteService;

#[derive(Clone)]
pub struct AppState {
    pub route_service: Arc<RouteService>,
}

impl AppState {
    pub fn new(route_service: Arc<RouteService>) -> Self {
        Self { route_service }
    }
}
