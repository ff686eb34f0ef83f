//! Great-circle distance over a flight path.

use crate::models::FlightPath;

// One degree of arc = 60 minutes, at 1.1515 statute miles per minute.
const DEGREES_TO_STATUTE_MILES: f64 = 60.0 * 1.1515;
const STATUTE_MILES_TO_KM: f64 = 1.609344;

/// Great-circle distance in kilometers between two coordinates, via the
/// spherical law of cosines.
///
/// Inputs are degrees. Identical points give `acos(1) = 0`; for
/// near-identical points the acos argument can round marginally past 1.0,
/// which yields NaN and is not corrected here.
pub fn great_circle_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lon = (lon1 - lon2).to_radians();

    let arc = (phi1.sin() * phi2.sin() + phi1.cos() * phi2.cos() * delta_lon.cos()).acos();
    arc.to_degrees() * DEGREES_TO_STATUTE_MILES * STATUTE_MILES_TO_KM
}

/// Sums the distances between consecutive path points.
///
/// Returns the total in kilometers plus the number of points processed. A
/// path with fewer than two points has no legs and totals 0.
pub fn path_distance_km(path: &FlightPath) -> (f64, usize) {
    let total = path
        .points
        .windows(2)
        .map(|leg| great_circle_km(leg[0].latitude, leg[0].longitude, leg[1].latitude, leg[1].longitude))
        .sum();
    (total, path.points.len())
}
