//! The adaptive terrain tiling pass for the inside of a hollow sphere.
//!
//! A pass takes a viewer location and an immutable [`TilingParams`] value,
//! selects leaf tiles with the quadtree selector, fetches each tile's rasters
//! through a [`RasterProvider`] on a worker pool, and builds one
//! [`hollow_mesh::TileMesh`] per tile. Tiles whose rasters cannot be fetched
//! or are malformed are reported in [`TilingOutput::failures`] and left out.

mod error;
mod params;
mod pass;
mod provider;

pub use error::{EngineError, FetchError, TileFailure};
pub use params::{FetchParams, TilingParams};
pub use pass::{PassSummary, RenderableTile, TilingEngine, TilingOutput};
pub use provider::{DirectoryRasterProvider, RasterProvider, TileRasters};
