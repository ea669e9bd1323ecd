//! Great-circle distance on the mean-radius sphere.
//!
//! The plausibility tracker compares a candidate fix against the last rejected
//! one by surface distance. The exact earth model matters less than the
//! properties the comparison relies on: the function is symmetric in its
//! arguments and monotonic in separation, and the same model is used for the
//! whole session. Haversine on the IUGG mean radius satisfies all three and
//! stays within a fraction of a percent of ellipsoidal models at the
//! kilometre scale this crate cares about.

/// IUGG mean earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

/// Great-circle distance between two coordinates, in meters.
///
/// Haversine formula; numerically stable for the small separations the
/// plausibility threshold operates at.
///
/// # Example
///
/// ```
/// use trustfix::coord::distance_meters;
///
/// // One degree of longitude at the equator is ~111.2 km.
/// let d = distance_meters(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 111_195.0).abs() < 100.0);
/// ```
pub fn distance_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_METERS * c
}
