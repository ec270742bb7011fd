//! Slippy-map tile addressing and quadtree level-of-detail selection around a viewer.

mod address;
mod bounds;
mod error;
mod mapper;
mod selector;

pub use address::TileAddress;
pub use bounds::{GeoBounds, GeoPoint, MAX_LATITUDE};
pub use error::TileError;
pub use mapper::{
    EARTH_RADIUS_KM, KM_PER_DEGREE, approximate_size_km, great_circle_distance_km, tile_bounds,
    to_tile_address,
};
pub use selector::{LeafTileSet, NodeAction, QuadtreeNode, QuadtreeSelector, SelectionParams};
