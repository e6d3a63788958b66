//! Route and distance payloads

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, CoordinateInput};

/// `GET /v1/route?start=lat,lng&end=lat,lng`
#[derive(Debug, Clone, Deserialize)]
pub struct RouteQuery {
    pub start: String,
    pub end: String,
}

/// A resolved path with its length
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteResponse {
    /// `[lat, lng]` pairs from start to end
    pub coordinates: Vec<Coordinate>,
    pub distance_km: f64,
    /// Human-readable length, e.g. `"850m"` or `"12.4km"`
    pub distance: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StopsPathRequest {
    pub stops: Vec<CoordinateInput>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DistanceRequest {
    pub coordinates: Vec<CoordinateInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistanceResponse {
    pub distance_km: f64,
    pub distance: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_request_accepts_mixed_inputs() {
        let request: DistanceRequest =
            serde_json::from_str(r#"{"coordinates": ["12.97,77.59", [12.98, 77.6]]}"#).unwrap();

        assert_eq!(request.coordinates.len(), 2);
    }

    #[test]
    fn test_route_response_serializes_pairs() {
        let response = RouteResponse {
            coordinates: vec![Coordinate::new(1.5, 2.5).unwrap()],
            distance_km: 0.0,
            distance: "0m".to_string(),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["coordinates"][0][0], 1.5);
        assert_eq!(json["coordinates"][0][1], 2.5);
        assert_eq!(json["distance"], "0m");
    }
}
