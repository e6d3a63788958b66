//! OSRM road-routing provider

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::coordinate::Coordinate;
use crate::domain::distance::calculate_distance;
use crate::domain::route::RouteProvider;
use crate::domain::DomainError;

const PROVIDER: &str = "osrm";

/// Configuration for the OSRM client
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server
    pub base_url: String,
    /// Routing profile (e.g., "driving")
    pub profile: String,
    /// Client identifier sent as `User-Agent`
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            profile: "driving".to_string(),
            user_agent: concat!("BusTrackerApp/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl OsrmConfig {
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<Route>,
}

#[derive(Debug, Deserialize)]
struct Route {
    geometry: Geometry,
    #[serde(default)]
    distance: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    coordinates: Vec<[f64; 2]>,
}

/// Road-routing provider backed by the OSRM HTTP API
#[derive(Debug, Clone)]
pub struct OsrmProvider {
    client: reqwest::Client,
    config: OsrmConfig,
}

impl OsrmProvider {
    pub fn new(config: OsrmConfig) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| {
                DomainError::configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// `/route/v1/{profile}/{lng1},{lat1};{lng2},{lat2}` with full GeoJSON geometry
    fn route_url(&self, start: Coordinate, end: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            start.lng(),
            start.lat(),
            end.lng(),
            end.lat()
        )
    }
}

#[async_trait]
impl RouteProvider for OsrmProvider {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    async fn fetch_route(
        &self,
        start: Coordinate,
        end: Coordinate,
    ) -> Result<Vec<Coordinate>, DomainError> {
        let url = self.route_url(start, end);
        debug!(url = %url, "Requesting road route");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::provider(PROVIDER, format!("Request failed: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            if status == StatusCode::TOO_MANY_REQUESTS {
                warn!("Rate limited by OSRM");
            }

            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::provider(
                PROVIDER,
                format!("HTTP {}: {}", status, body),
            ));
        }

        let body: RouteResponse = response.json().await.map_err(|e| {
            DomainError::provider(PROVIDER, format!("Failed to parse response: {}", e))
        })?;

        if let Some(code) = body.code.as_deref().filter(|code| *code != "Ok") {
            return Err(DomainError::provider(
                PROVIDER,
                format!("{}: {}", code, body.message.unwrap_or_default()),
            ));
        }

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::provider(PROVIDER, "No route in response"))?;

        let path = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinate::new(lat, lng))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DomainError::provider(PROVIDER, format!("Invalid geometry: {}", e)))?;

        if path.is_empty() {
            return Err(DomainError::provider(PROVIDER, "Route geometry is empty"));
        }

        if let Some(meters) = route.distance {
            debug!(
                reported_km = meters / 1000.0,
                geometry_km = calculate_distance(&path),
                points = path.len(),
                "Resolved road route"
            );
        }

        Ok(path)
    }
}
