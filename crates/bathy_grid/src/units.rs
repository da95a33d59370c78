//! Scalar conversions between metres and decimal degrees.
//!
//! Used to pick cell sizes and tolerances in metres for geographic (lon/lat) data. These
//! are local approximations at a given latitude, not a reprojection.

/// Equatorial perimeter of the Earth in metres.
pub const EARTH_PERIMETER_M: f64 = 40_068_000.0;

const NAUTICAL_MILES_PER_DEGREE: f64 = 60.0;
const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;

/// Longitudinal extent in degrees of `distance_m` metres at `latitude_deg`.
///
/// Diverges towards the poles, where a degree of longitude shrinks to nothing.
pub fn meters_to_degrees(distance_m: f64, latitude_deg: f64) -> f64 {
    distance_m / (EARTH_PERIMETER_M * latitude_deg.to_radians().cos()) * 360.0
}

/// Inverse of [`meters_to_degrees`].
pub fn degrees_to_meters(distance_deg: f64, latitude_deg: f64) -> f64 {
    distance_deg / 360.0 * (EARTH_PERIMETER_M * latitude_deg.to_radians().cos())
}

/// Great-circle distance in metres between two lon/lat points, by the spherical law of
/// cosines.
pub fn distance_on_sphere(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    if lon1 == lon2 && lat1 == lat2 {
        return 0.0;
    }
    let a = lat1.to_radians();
    let b = lat2.to_radians();
    let c = (lon2 - lon1).to_radians();
    // Rounding can push nearly identical points just past 1.
    let x = (a.sin() * b.sin() + a.cos() * b.cos() * c.cos()).clamp(-1.0, 1.0);
    x.acos().to_degrees() * NAUTICAL_MILES_PER_DEGREE * METERS_PER_NAUTICAL_MILE
}
