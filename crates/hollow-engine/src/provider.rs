//! The raster source seam and a filesystem-backed implementation.

use std::path::{Path, PathBuf};

use hollow_config::ProviderConfig;
use hollow_mesh::{PixelFormat, Raster};
use hollow_tiles::TileAddress;

use crate::FetchError;

/// The elevation and colour rasters covering one tile.
#[derive(Clone, Debug, PartialEq)]
pub struct TileRasters {
    /// Terrain-RGB encoded elevation.
    pub elevation: Raster,
    /// Surface imagery.
    pub color: Raster,
}

impl TileRasters {
    /// Reject rasters whose edge length differs from the expected size.
    ///
    /// A `None` expectation accepts any dimensions.
    pub fn check_sizes(
        &self,
        expected_elevation: Option<u32>,
        expected_color: Option<u32>,
    ) -> Result<(), FetchError> {
        if let Some(size) = expected_elevation {
            self.elevation.expect_size(size, size)?;
        }
        if let Some(size) = expected_color {
            self.color.expect_size(size, size)?;
        }
        Ok(())
    }
}

/// Supplies the rasters for a tile. Called concurrently from worker threads.
///
/// Retries, caching and network access are the provider's business; a
/// failure here only drops the one tile.
pub trait RasterProvider: Send + Sync {
    /// Fetch both rasters for `address`.
    fn fetch_tile(&self, address: TileAddress) -> Result<TileRasters, FetchError>;
}

impl<F> RasterProvider for F
where
    F: Fn(TileAddress) -> Result<TileRasters, FetchError> + Send + Sync,
{
    fn fetch_tile(&self, address: TileAddress) -> Result<TileRasters, FetchError> {
        self(address)
    }
}

/// Reads tiles from `<root>/<dir>/<z>/<x>/<y>.<ext>`.
///
/// Elevation images are converted to RGB8 and colour images to RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectoryRasterProvider {
    root: PathBuf,
    elevation_dir: String,
    color_dir: String,
    elevation_extension: String,
    color_extension: String,
}

impl DirectoryRasterProvider {
    /// Provider rooted at `root` with the default layout
    /// (`elevation/*.png`, `color/*.jpg`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let defaults = ProviderConfig::default();
        Self {
            root: root.into(),
            ..Self::from_config(&defaults)
        }
    }

    /// Provider using the layout in `config`.
    pub fn from_config(config: &ProviderConfig) -> Self {
        Self {
            root: config.tile_root.clone(),
            elevation_dir: config.elevation_dir.clone(),
            color_dir: config.color_dir.clone(),
            elevation_extension: config.elevation_extension.clone(),
            color_extension: config.color_extension.clone(),
        }
    }

    /// Override the file extensions.
    #[must_use]
    pub fn with_extensions(mut self, elevation: &str, color: &str) -> Self {
        self.elevation_extension = elevation.to_string();
        self.color_extension = color.to_string();
        self
    }

    /// Root of the tile tree.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the elevation image for `address`.
    pub fn elevation_path(&self, address: TileAddress) -> PathBuf {
        tile_path(&self.root, &self.elevation_dir, address, &self.elevation_extension)
    }

    /// Path of the colour image for `address`.
    pub fn color_path(&self, address: TileAddress) -> PathBuf {
        tile_path(&self.root, &self.color_dir, address, &self.color_extension)
    }
}

fn tile_path(root: &Path, dir: &str, address: TileAddress, extension: &str) -> PathBuf {
    root.join(dir)
        .join(address.level.to_string())
        .join(address.x.to_string())
        .join(format!("{}.{extension}", address.y))
}

fn load_raster(path: &Path, format: PixelFormat) -> Result<Raster, FetchError> {
    if !path.is_file() {
        return Err(FetchError::NotFound(path.to_path_buf()));
    }
    let image = image::open(path).map_err(|err| match err {
        image::ImageError::IoError(source) => FetchError::Io {
            path: path.to_path_buf(),
            source,
        },
        source => FetchError::Decode {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let raster = match format {
        PixelFormat::Rgb8 => {
            let rgb = image.to_rgb8();
            Raster::from_packed(rgb.width(), rgb.height(), format, rgb.into_raw())?
        }
        PixelFormat::Rgba8 => {
            let rgba = image.to_rgba8();
            Raster::from_packed(rgba.width(), rgba.height(), format, rgba.into_raw())?
        }
    };
    Ok(raster)
}

impl RasterProvider for DirectoryRasterProvider {
    fn fetch_tile(&self, address: TileAddress) -> Result<TileRasters, FetchError> {
        let elevation = load_raster(&self.elevation_path(address), PixelFormat::Rgb8)?;
        let color = load_raster(&self.color_path(address), PixelFormat::Rgba8)?;
        Ok(TileRasters { elevation, color })
    }
}
