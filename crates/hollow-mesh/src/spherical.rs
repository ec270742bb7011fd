//! Explicit spherical ↔ Cartesian convention shared by the mesh builder and skirts.
//!
//! Axes:
//! - `+Y` points at the north pole (latitude +90°).
//! - Latitude 0°, longitude 0° lies on `+Z`.
//! - Longitude is negated before conversion, so longitude +90° (east) lies on
//!   `-X`. This keeps west→east texture rows running in the same direction as
//!   the colour raster when viewed from inside the sphere.

use glam::DVec3;

/// Convert latitude/longitude in degrees and a radius to a Cartesian point.
#[must_use]
pub fn spherical_to_cartesian(lat_deg: f64, lon_deg: f64, radius: f64) -> DVec3 {
    let lat = lat_deg.to_radians();
    let theta = (-lon_deg).to_radians();
    let ring = radius * lat.cos();
    DVec3::new(ring * theta.sin(), radius * lat.sin(), ring * theta.cos())
}

/// Inverse of [`spherical_to_cartesian`]: returns `(lat_deg, lon_deg, radius)`.
///
/// The origin maps to `(0, 0, 0)`.
#[must_use]
pub fn cartesian_to_spherical(point: DVec3) -> (f64, f64, f64) {
    let radius = point.length();
    if radius == 0.0 {
        return (0.0, 0.0, 0.0);
    }
    let lat = (point.y / radius).clamp(-1.0, 1.0).asin().to_degrees();
    let lon = -point.x.atan2(point.z).to_degrees();
    (lat, lon, radius)
}
