//! Builds the displaced inner-sphere grid for one leaf tile.
//!
//! Vertices sit on the *inside* of the planet sphere. Elevation is subtracted
//! from the radius, so mountains reach toward the center where an interior
//! observer stands, and triangles wind so their faces point at the center.

use hollow_tiles::{GeoBounds, QuadtreeNode};
use tracing::trace;

use crate::elevation::sample_elevation_m;
use crate::skirt::generate_skirts;
use crate::spherical::spherical_to_cartesian;
use crate::{ElevationParams, MeshError, Raster, TileMesh};

/// Largest accepted segment count per tile axis. Keeps `(n + 1)²` vertices
/// and `6n²` indices well inside `u32`.
pub const MAX_SEGMENTS: u32 = 4096;

/// Geometry parameters shared by every tile in a pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshParams {
    /// Planet radius in kilometres.
    pub planet_radius_km: f64,
    /// Distance the zero-elevation surface sits inside the planet radius.
    pub surface_offset_km: f64,
    /// Fewest grid cells per tile axis.
    pub min_segments: u32,
    /// Most grid cells per tile axis.
    pub max_segments: u32,
    /// Level at which tiles use exactly `min_segments`; each level above
    /// doubles the count until `max_segments`.
    pub reference_level: u8,
    /// Elevation clamp and exaggeration.
    pub elevation: ElevationParams,
    /// Radial length of edge skirts in kilometres; zero disables skirts.
    pub skirt_depth_km: f64,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            planet_radius_km: 6371.0,
            surface_offset_km: 5.0,
            min_segments: 16,
            max_segments: 64,
            reference_level: 10,
            elevation: ElevationParams::default(),
            skirt_depth_km: 1.0,
        }
    }
}

impl MeshParams {
    /// Reject parameters that cannot produce a well-formed mesh.
    pub fn validate(&self) -> Result<(), MeshError> {
        let base = self.base_radius_km();
        if !base.is_finite() || base <= 0.0 {
            return Err(MeshError::InvalidRadius(base));
        }
        if self.min_segments == 0
            || self.min_segments > self.max_segments
            || self.max_segments > MAX_SEGMENTS
        {
            return Err(MeshError::InvalidSegments {
                min: self.min_segments,
                max: self.max_segments,
            });
        }
        if !self.skirt_depth_km.is_finite() || self.skirt_depth_km < 0.0 {
            return Err(MeshError::InvalidSkirtDepth(self.skirt_depth_km));
        }
        let exaggeration = self.elevation.exaggeration;
        if !exaggeration.is_finite() || exaggeration < 0.0 {
            return Err(MeshError::InvalidExaggeration(exaggeration));
        }
        let floor = self.elevation.ocean_floor_m;
        if !floor.is_finite() || floor > 0.0 {
            return Err(MeshError::InvalidOceanFloor(floor));
        }
        Ok(())
    }

    /// Radius of the zero-elevation surface.
    #[must_use]
    pub fn base_radius_km(&self) -> f64 {
        self.planet_radius_km - self.surface_offset_km
    }

    /// Grid cells per axis for a tile at `level`:
    /// `min_segments · 2^(level − reference_level)`, clamped to the bounds.
    #[must_use]
    pub fn segments_for_level(&self, level: u8) -> u32 {
        let min = self.min_segments.max(1);
        let max = self.max_segments.max(min);
        if level <= self.reference_level {
            return min;
        }
        let shift = u32::from(level - self.reference_level).min(31);
        (u64::from(min) << shift).min(u64::from(max)) as u32
    }

    /// Radius of a vertex whose decoded elevation is `elevation_m`.
    #[must_use]
    pub fn vertex_radius_km(&self, elevation_m: f64) -> f64 {
        self.base_radius_km() - self.elevation.displacement_km(elevation_m)
    }
}

/// Build the `(segments + 1)²` grid over `bounds` without skirts.
///
/// Rows run north to south and columns west to east. The texture coordinate
/// of a vertex is `(u, 1 − v)` where `v` runs south to north, so row 0 of the
/// raster lands on the northern edge; elevation is sampled at the same
/// texture coordinate.
pub fn build_grid_mesh(
    bounds: &GeoBounds,
    segments: u32,
    elevation: &Raster,
    params: &MeshParams,
) -> TileMesh {
    let n = segments.max(1);
    let side = (n + 1) as usize;

    let mut positions = Vec::with_capacity(side * side);
    let mut uvs = Vec::with_capacity(side * side);

    for row in 0..=n {
        let t = row as f64 / n as f64;
        let v = 1.0 - t;
        for col in 0..=n {
            let u = col as f64 / n as f64;
            let point = bounds.lerp(u, v);
            let elevation_m = sample_elevation_m(elevation, u, t);
            let radius = params.vertex_radius_km(elevation_m);
            let p = spherical_to_cartesian(point.lat, point.lon, radius);
            positions.push(p.as_vec3().to_array());
            uvs.push([u as f32, t as f32]);
        }
    }

    let mut indices = Vec::with_capacity((n * n * 6) as usize);
    for row in 0..n {
        for col in 0..n {
            let a = row * (n + 1) + col;
            let b = a + 1;
            let s = a + n + 1;
            let d = s + 1;
            indices.extend_from_slice(&[a, s, b]);
            indices.extend_from_slice(&[b, s, d]);
        }
    }

    TileMesh {
        grid_vertex_count: positions.len(),
        grid_index_count: indices.len(),
        positions,
        uvs,
        indices,
        segments: n,
    }
}

/// Build the complete mesh for a leaf tile: the displaced grid at the
/// level's segment count followed by skirts on all four edges.
pub fn build_tile_mesh(node: &QuadtreeNode, elevation: &Raster, params: &MeshParams) -> TileMesh {
    let segments = params.segments_for_level(node.address.level);
    let mut mesh = build_grid_mesh(&node.bounds, segments, elevation, params);
    let skirt_triangles = generate_skirts(&mut mesh, params.skirt_depth_km as f32);
    trace!(
        tile = %node.address,
        segments,
        vertices = mesh.vertex_count(),
        skirt_triangles,
        "built tile mesh"
    );
    mesh
}
