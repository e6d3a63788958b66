//! Coordinate value object and input normalization

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// A validated (latitude, longitude) pair
///
/// Serialized as the JSON array `[lat, lng]`, the order the map view uses.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(into = "[f64; 2]", try_from = "[f64; 2]")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values
    pub fn new(lat: f64, lng: f64) -> Result<Self, DomainError> {
        let input = format!("{},{}", lat, lng);

        if !lat.is_finite() {
            return Err(DomainError::invalid_coordinate(
                input,
                "latitude must be a finite number",
            ));
        }

        if !lng.is_finite() {
            return Err(DomainError::invalid_coordinate(
                input,
                "longitude must be a finite number",
            ));
        }

        if !(-90.0..=90.0).contains(&lat) {
            return Err(DomainError::invalid_coordinate(
                input,
                "latitude must be between -90 and 90",
            ));
        }

        if !(-180.0..=180.0).contains(&lng) {
            return Err(DomainError::invalid_coordinate(
                input,
                "longitude must be between -180 and 180",
            ));
        }

        // -0.0 and 0.0 compare equal and must format and order alike.
        Ok(Self {
            lat: lat + 0.0,
            lng: lng + 0.0,
        })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Orders coordinates by latitude, then longitude
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.lat
            .total_cmp(&other.lat)
            .then_with(|| self.lng.total_cmp(&other.lng))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for Coordinate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(',');

        let (Some(lat), Some(lng), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DomainError::invalid_coordinate(
                s,
                "expected exactly two comma-separated numbers",
            ));
        };

        let lat: f64 = lat
            .trim()
            .parse()
            .map_err(|_| DomainError::invalid_coordinate(s, "latitude is not a number"))?;
        let lng: f64 = lng
            .trim()
            .parse()
            .map_err(|_| DomainError::invalid_coordinate(s, "longitude is not a number"))?;

        Self::new(lat, lng)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coord: Coordinate) -> Self {
        [coord.lat, coord.lng]
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = DomainError;

    fn try_from(pair: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(pair[0], pair[1])
    }
}

/// Coordinate as it arrives at the boundary: a `"lat,lng"` string or a pair
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CoordinateInput {
    Text(String),
    Pair([f64; 2]),
}

impl From<&str> for CoordinateInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for CoordinateInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<[f64; 2]> for CoordinateInput {
    fn from(value: [f64; 2]) -> Self {
        Self::Pair(value)
    }
}

impl From<(f64, f64)> for CoordinateInput {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self::Pair([lat, lng])
    }
}

impl From<Coordinate> for CoordinateInput {
    fn from(coord: Coordinate) -> Self {
        Self::Pair(coord.into())
    }
}

/// Normalize either boundary representation into a validated coordinate
pub fn normalize(input: impl Into<CoordinateInput>) -> Result<Coordinate, DomainError> {
    match input.into() {
        CoordinateInput::Text(text) => text.parse(),
        CoordinateInput::Pair(pair) => Coordinate::try_from(pair),
    }
}
