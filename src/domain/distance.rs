//! Great-circle path length and its display format

use crate::domain::coordinate::Coordinate;

/// Mean Earth radius in kilometers
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two points, in kilometers
pub fn haversine_km(from: &Coordinate, to: &Coordinate) -> f64 {
    let d_lat = (to.lat() - from.lat()).to_radians();
    let d_lng = (to.lng() - from.lng()).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + from.lat().to_radians().cos() * to.lat().to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Total length of a path in kilometers; empty and single-point paths are 0
pub fn calculate_distance(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_km(&pair[0], &pair[1]))
        .sum()
}

/// Meters below one kilometer, otherwise kilometers with one decimal
pub fn format_distance(kilometers: f64) -> String {
    if kilometers < 1.0 {
        format!("{}m", (kilometers * 1000.0).round() as i64)
    } else {
        format!("{:.1}km", kilometers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_one_degree_longitude_at_equator() {
        let distance = calculate_distance(&[coord(0.0, 0.0), coord(0.0, 1.0)]);
        assert!((distance - 111.195).abs() < 0.01, "got {}", distance);
    }

    #[test]
    fn test_empty_and_single_point_paths() {
        assert_eq!(calculate_distance(&[]), 0.0);
        assert_eq!(calculate_distance(&[coord(12.97, 77.59)]), 0.0);
    }

    #[test]
    fn test_distance_sums_segments() {
        let path = [coord(0.0, 0.0), coord(0.0, 1.0), coord(0.0, 2.0)];
        let whole = calculate_distance(&path);
        let first = haversine_km(&path[0], &path[1]);
        let second = haversine_km(&path[1], &path[2]);

        assert!((whole - (first + second)).abs() < 1e-9);
        assert!((whole - 222.39).abs() < 0.01);
    }

    #[test]
    fn test_distance_is_direction_independent() {
        let a = coord(12.9716, 77.5946);
        let b = coord(12.9352, 77.6245);

        assert!((haversine_km(&a, &b) - haversine_km(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn test_format_boundary() {
        assert_eq!(format_distance(0.999), "999m");
        assert_eq!(format_distance(1.0), "1.0km");
    }

    #[test]
    fn test_format_values() {
        assert_eq!(format_distance(0.0), "0m");
        assert_eq!(format_distance(0.2504), "250m");
        assert_eq!(format_distance(12.34), "12.3km");
        assert_eq!(format_distance(111.195), "111.2km");
    }
}
