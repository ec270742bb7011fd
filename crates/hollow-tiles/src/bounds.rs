//! Geographic points and tile bounding boxes.

use crate::TileError;

/// Largest latitude a viewer may request. The Mercator tile scheme itself
/// reaches ~85.0511°, so this keeps every seed tile well defined.
pub const MAX_LATITUDE: f64 = 85.0;

/// A latitude/longitude pair in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lon: f64,
}

impl GeoPoint {
    /// Create a validated viewer location.
    ///
    /// Tiling assumes the viewer lies inside `±85°` latitude and `±180°`
    /// longitude; callers must go through this constructor (or otherwise
    /// guarantee the range) before starting a pass.
    pub fn new(lat: f64, lon: f64) -> Result<Self, TileError> {
        if !lat.is_finite() || lat.abs() > MAX_LATITUDE {
            return Err(TileError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || lon.abs() > 180.0 {
            return Err(TileError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Create a point without range checks. Used for tile centers and corners,
    /// which are valid by construction.
    #[must_use]
    pub const fn new_unchecked(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Geographic extent of a tile in degrees.
///
/// Always derived from a [`crate::TileAddress`] via [`crate::tile_bounds`];
/// never stored alongside the address in a way that could drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoBounds {
    /// Northern edge latitude.
    pub north: f64,
    /// Southern edge latitude.
    pub south: f64,
    /// Eastern edge longitude.
    pub east: f64,
    /// Western edge longitude.
    pub west: f64,
}

impl GeoBounds {
    /// Midpoint of the latitude and longitude ranges.
    #[must_use]
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new_unchecked(
            (self.north + self.south) * 0.5,
            (self.east + self.west) * 0.5,
        )
    }

    /// Latitude span in degrees.
    #[must_use]
    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    /// Longitude span in degrees.
    #[must_use]
    pub fn lon_span(&self) -> f64 {
        self.east - self.west
    }

    /// Returns `true` if the point lies inside the half-open box
    /// `[south, north) × [west, east)`.
    ///
    /// The half-open convention means a point on a shared edge belongs to
    /// exactly one of two adjacent tiles.
    #[must_use]
    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat < self.north
            && point.lon >= self.west
            && point.lon < self.east
    }

    /// Linear interpolation inside the box: `u` runs west→east, `v` runs
    /// south→north, both in `[0, 1]`.
    #[must_use]
    pub fn lerp(&self, u: f64, v: f64) -> GeoPoint {
        GeoPoint::new_unchecked(
            self.south + (self.north - self.south) * v,
            self.west + (self.east - self.west) * u,
        )
    }
}
