//! Terrain meshing for the inside of a sphere: raster sampling, elevation
//! decoding, displaced grid construction, and crack-hiding skirts.

mod builder;
mod elevation;
mod error;
mod raster;
mod skirt;
mod spherical;
mod tile_mesh;

pub use builder::{MAX_SEGMENTS, MeshParams, build_grid_mesh, build_tile_mesh};
pub use elevation::{
    ELEVATION_BASE_M, ELEVATION_STEP_M, ElevationParams, decode_terrain_rgb, sample_elevation_m,
};
pub use error::{MeshError, RasterError};
pub use raster::{PixelFormat, Raster};
pub use skirt::{TileEdge, generate_skirt, generate_skirts};
pub use spherical::{cartesian_to_spherical, spherical_to_cartesian};
pub use tile_mesh::TileMesh;
