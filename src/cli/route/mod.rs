//! One-shot route and distance commands

use clap::Args;
use tracing::info;

use crate::api::types::{DistanceResponse, RouteResponse};
use crate::domain::{calculate_distance, format_distance, normalize};
use crate::infrastructure::logging;
use crate::infrastructure::services::RouteService;

#[derive(Args, Clone)]
pub struct RouteArgs {
    /// Start point as `lat,lng`
    #[arg(long, allow_hyphen_values = true)]
    pub start: String,

    /// End point as `lat,lng`
    #[arg(long, allow_hyphen_values = true)]
    pub end: String,
}

#[derive(Args, Clone)]
pub struct DistanceArgs {
    /// Points as `lat,lng`, in path order
    #[arg(required = true, allow_hyphen_values = true)]
    pub points: Vec<String>,
}

/// Resolve and print one path
pub async fn run_route(args: RouteArgs) -> anyhow::Result<()> {
    let config = super::load_config()?;
    logging::init_logging(&config.logging);

    let service = RouteService::from_config(&config)?;
    let coordinates = service
        .get_route_coordinates(args.start.as_str(), args.end.as_str())
        .await?;

    let distance_km = service.calculate_distance(&coordinates);
    info!(points = coordinates.len(), distance_km, "Route resolved");

    let response = RouteResponse {
        coordinates,
        distance_km,
        distance: service.format_distance(distance_km),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Print the haversine length of the given points
pub fn run_distance(args: DistanceArgs) -> anyhow::Result<()> {
    let path = args
        .points
        .iter()
        .map(|point| normalize(point.as_str()))
        .collect::<Result<Vec<_>, _>>()?;

    let distance_km = calculate_distance(&path);
    let response = DistanceResponse {
        distance_km,
        distance: format_distance(distance_km),
    };

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_distance_rejects_invalid_point() {
        let args = DistanceArgs {
            points: vec!["0,0".to_string(), "north".to_string()],
        };

        assert!(run_distance(args).is_err());
    }

    #[test]
    fn test_run_distance_accepts_negative_coordinates() {
        let args = DistanceArgs {
            points: vec!["-33.86,151.2".to_string(), "-33.87,151.21".to_string()],
        };

        assert!(run_distance(args).is_ok());
    }
}
