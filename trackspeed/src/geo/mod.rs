//! Geographic math for track processing.
//!
//! Provides great-circle distance between coordinate pairs and the rounding
//! policy used to build cache keys.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Distance: kilometres

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Decimal places kept when rounding coordinates (~1.1 m at the equator).
pub const COORD_DECIMALS: i32 = 5;

/// Calculate the great-circle distance between two positions.
///
/// Uses the haversine formula on a spherical Earth.
///
/// # Arguments
///
/// * `a` - First position as (latitude, longitude) in degrees
/// * `b` - Second position as (latitude, longitude) in degrees
///
/// # Example
///
/// ```
/// use trackspeed::geo::distance_km;
///
/// // One degree of latitude is ~111 km
/// let d = distance_km((0.0, 0.0), (1.0, 0.0));
/// assert!((d - 111.19).abs() < 0.01);
/// ```
pub fn distance_km(a: (f64, f64), b: (f64, f64)) -> f64 {
    let (lat1, lon1) = (a.0.to_radians(), a.1.to_radians());
    let (lat2, lon2) = (b.0.to_radians(), b.1.to_radians());

    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Clamp guards against h drifting just above 1.0 for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_KM * c
}

/// Round a coordinate to [`COORD_DECIMALS`] decimal places.
///
/// Negative zero is normalised so that `-0.000001` and `0.000001` share a key.
#[inline]
pub fn round_coord(value: f64) -> f64 {
    let factor = 10f64.powi(COORD_DECIMALS);
    (value * factor).round() / factor + 0.0
}
