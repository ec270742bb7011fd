//! Per-tile fetch failures and engine construction errors.

use std::path::PathBuf;

use hollow_mesh::{MeshError, RasterError};
use hollow_tiles::{TileAddress, TileError};

/// Why a leaf tile's rasters could not be used.
///
/// Every variant is local to one tile: the pass records it and carries on.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// No raster exists for the tile.
    #[error("tile image not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Reading the tile image failed.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Image path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The tile image exists but could not be decoded.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        /// Image path.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// The raster has the wrong shape for this pass.
    #[error("malformed raster: {0}")]
    Malformed(#[from] RasterError),

    /// Any other provider-specific failure.
    #[error("provider error: {0}")]
    Provider(String),
}

/// A leaf tile that was dropped from the pass output.
#[derive(Debug)]
pub struct TileFailure {
    /// The tile that failed.
    pub address: TileAddress,
    /// Why it failed.
    pub error: FetchError,
}

/// Parameters rejected when constructing a [`crate::TilingEngine`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Quadtree selection parameters are inconsistent.
    #[error("invalid selection parameters: {0}")]
    Selection(#[from] TileError),

    /// Mesh parameters are inconsistent.
    #[error("invalid mesh parameters: {0}")]
    Mesh(#[from] MeshError),

    /// `max_concurrent` was set to zero.
    #[error("fetch concurrency must be at least 1")]
    NoWorkers,
}
