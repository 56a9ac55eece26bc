use std::f64::consts::PI;

/// Coefficient to translate from degrees to radians
pub const DEGREE_RAD: f64 = PI / 180.0;

use super::point::Point;

/// Calculates the great-circle distance between two points, in degrees
///
/// Haversine central angle converted back to degrees, i.e. the figure a
/// geodesic library reports for "distance in degrees".
pub fn distance_degrees(a: &Point, b: &Point) -> f64 {
    let d_lat = (b.lat - a.lat).abs() * DEGREE_RAD;
    let d_lng = (b.lng - a.lng).abs() * DEGREE_RAD;
    let lat1 = a.lat * DEGREE_RAD;
    let lat2 = b.lat * DEGREE_RAD;

    let h = (d_lat / 2.0).sin().powi(2)
        + (d_lng / 2.0).sin().powi(2) * (lat1.cos() * lat2.cos());
    // rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * h.sqrt().atan2((1.0 - h).sqrt()) / DEGREE_RAD
}
