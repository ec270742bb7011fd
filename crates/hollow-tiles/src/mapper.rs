//! Conversions between geographic coordinates and slippy-map tile addresses,
//! plus the distance heuristics used by the selector.

use std::f64::consts::PI;

use crate::{GeoBounds, GeoPoint, TileAddress};

/// Mean planetary radius used for all kilometre conversions.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Length of one degree of arc on a great circle of [`EARTH_RADIUS_KM`].
pub const KM_PER_DEGREE: f64 = 2.0 * PI * EARTH_RADIUS_KM / 360.0;

/// Map a latitude/longitude to the tile containing it at `level`.
///
/// Longitude maps linearly onto `x`; latitude goes through the Mercator
/// forward projection `asinh(tan(lat))`. Indices are clamped to
/// `[0, 2^level - 1]`, so the antimeridian and the poles are not wrapped.
/// Results are only meaningful for latitudes inside ±85°.
#[must_use]
pub fn to_tile_address(lat: f64, lon: f64, level: u8) -> TileAddress {
    let n = TileAddress::tiles_per_axis(level);
    let nf = n as f64;

    let x = ((lon + 180.0) / 360.0 * nf).floor();
    let lat_rad = lat.to_radians();
    let y = ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * nf).floor();

    let max = (n - 1) as f64;
    TileAddress::new(level, x.clamp(0.0, max) as u32, y.clamp(0.0, max) as u32)
}

/// Geographic bounds of a tile, the exact inverse of [`to_tile_address`].
#[must_use]
pub fn tile_bounds(address: TileAddress) -> GeoBounds {
    let n = TileAddress::tiles_per_axis(address.level) as f64;
    GeoBounds {
        north: row_to_lat(address.y as f64, n),
        south: row_to_lat(address.y as f64 + 1.0, n),
        west: address.x as f64 / n * 360.0 - 180.0,
        east: (address.x as f64 + 1.0) / n * 360.0 - 180.0,
    }
}

fn row_to_lat(row: f64, n: f64) -> f64 {
    (PI * (1.0 - 2.0 * row / n)).sinh().atan().to_degrees()
}

/// Rough edge length of a tile in kilometres.
///
/// Takes the larger of the latitude span and the longitude span, the latter
/// scaled by `cos(mean latitude)`. Only used as a subdivision heuristic.
#[must_use]
pub fn approximate_size_km(bounds: &GeoBounds) -> f64 {
    let mean_lat = bounds.center().lat.to_radians();
    let lat_km = bounds.lat_span().abs() * KM_PER_DEGREE;
    let lon_km = bounds.lon_span().abs() * KM_PER_DEGREE * mean_lat.cos();
    lat_km.max(lon_km)
}

/// Great-circle distance between two points using the haversine formula.
#[must_use]
pub fn great_circle_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// Convenience wrapper over [`great_circle_distance_km`] for [`GeoPoint`]s.
pub(crate) fn distance_between(a: GeoPoint, b: GeoPoint) -> f64 {
    great_circle_distance_km(a.lat, a.lon, b.lat, b.lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tile_new_york() {
        let tile = to_tile_address(40.7128, -74.0060, 16);
        assert_eq!(tile, TileAddress::new(16, 19295, 24640));
    }

    #[test]
    fn test_level_zero_is_single_tile() {
        assert_eq!(to_tile_address(45.0, 90.0, 0), TileAddress::new(0, 0, 0));
        let b = tile_bounds(TileAddress::new(0, 0, 0));
        assert!((b.west + 180.0).abs() < 1e-9);
        assert!((b.east - 180.0).abs() < 1e-9);
        assert!((b.north - 85.051_128_78).abs() < 1e-6);
        assert!((b.south + 85.051_128_78).abs() < 1e-6);
    }

    #[test]
    fn test_edges_clamp_to_grid() {
        let tile = to_tile_address(0.0, 180.0, 4);
        assert_eq!(tile.x, 15);
        let tile = to_tile_address(89.9, -180.0, 4);
        assert_eq!((tile.x, tile.y), (0, 0));
    }

    #[test]
    fn test_center_round_trip() {
        for level in 0..=16u8 {
            let n = TileAddress::tiles_per_axis(level);
            let step = (n / 7).max(1);
            let mut x = 0;
            while x < n {
                let mut y = 0;
                while y < n {
                    let tile = TileAddress::new(level, x, y);
                    let c = tile_bounds(tile).center();
                    assert_eq!(
                        to_tile_address(c.lat, c.lon, level),
                        tile,
                        "round trip failed for {tile}"
                    );
                    y += step;
                }
                x += step;
            }
        }
    }

    #[test]
    fn test_adjacent_tiles_share_edges() {
        let a = tile_bounds(TileAddress::new(8, 100, 90));
        let east = tile_bounds(TileAddress::new(8, 101, 90));
        let south = tile_bounds(TileAddress::new(8, 100, 91));
        assert!((a.east - east.west).abs() < 1e-12);
        assert!((a.south - south.north).abs() < 1e-12);
    }

    #[test]
    fn test_haversine_one_degree_along_equator() {
        let d = great_circle_distance_km(0.0, 0.0, 0.0, 1.0);
        assert!((d - KM_PER_DEGREE).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn test_haversine_is_symmetric_and_zero_on_self() {
        let d1 = great_circle_distance_km(-38.85, 143.51, -33.86, 151.21);
        let d2 = great_circle_distance_km(-33.86, 151.21, -38.85, 143.51);
        assert!((d1 - d2).abs() < 1e-9);
        assert!(great_circle_distance_km(12.0, 34.0, 12.0, 34.0).abs() < 1e-9);
        // Melbourne-ish to Sydney-ish is roughly 850 km.
        assert!(d1 > 750.0 && d1 < 950.0, "got {d1}");
    }

    #[test]
    fn test_size_shrinks_with_level() {
        let coarse = approximate_size_km(&tile_bounds(to_tile_address(-38.85, 143.51, 6)));
        let fine = approximate_size_km(&tile_bounds(to_tile_address(-38.85, 143.51, 7)));
        assert!(fine < coarse);
        assert!((coarse / fine - 2.0).abs() < 0.15, "ratio {}", coarse / fine);
    }

    #[test]
    fn test_size_uses_wider_axis() {
        // A level-1 tile spans 180° of longitude but only ~85° of latitude.
        let b = tile_bounds(TileAddress::new(1, 0, 0));
        let lon_km = 180.0 * KM_PER_DEGREE * b.center().lat.to_radians().cos();
        assert!(lon_km > b.lat_span() * KM_PER_DEGREE);
        assert!((approximate_size_km(&b) - lon_km).abs() < 1e-6);
    }
}
