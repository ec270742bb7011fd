//! Configuration sections, their defaults, and RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE: &str = "config.ron";

/// Top-level tiler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Sphere dimensions.
    pub planet: PlanetConfig,
    /// Quadtree selection.
    pub tiling: TilingConfig,
    /// Elevation decoding policy.
    pub elevation: ElevationConfig,
    /// Mesh resolution and skirts.
    pub mesh: MeshConfig,
    /// Raster fetching.
    pub fetch: FetchConfig,
    /// On-disk tile layout.
    pub provider: ProviderConfig,
    /// Default viewpoint.
    pub viewer: ViewerConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Sphere dimensions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlanetConfig {
    /// Planet radius in kilometres.
    pub radius_km: f64,
    /// How far inside the planet radius the zero-elevation surface sits, in kilometres.
    pub surface_offset_km: f64,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius_km: 6371.0,
            surface_offset_km: 5.0,
        }
    }
}

/// Quadtree selection parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TilingConfig {
    /// Coarsest level; the area of interest is seeded here.
    pub min_level: u8,
    /// Finest level a tile may be refined to.
    pub max_level: u8,
    /// A tile is refined while its center is closer than `size × factor`.
    pub subdivision_factor: f64,
    /// Radius of the area of interest in kilometres.
    pub max_radius_km: f64,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            min_level: 6,
            max_level: 12,
            subdivision_factor: 2.0,
            max_radius_km: 800.0,
        }
    }
}

/// Elevation decoding policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ElevationConfig {
    /// Multiplier applied to elevations after clamping.
    pub exaggeration: f64,
    /// Lowest elevation kept for ocean samples, in metres.
    pub ocean_floor_m: f64,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            exaggeration: 3.0,
            ocean_floor_m: -50.0,
        }
    }
}

/// Mesh resolution and skirts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MeshConfig {
    /// Fewest grid cells per tile axis.
    pub min_segments: u32,
    /// Most grid cells per tile axis.
    pub max_segments: u32,
    /// Level that uses `min_segments`; finer levels double per step.
    pub reference_level: u8,
    /// Skirt length in kilometres (0 disables skirts).
    pub skirt_depth_km: f64,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            min_segments: 16,
            max_segments: 64,
            reference_level: 10,
            skirt_depth_km: 1.0,
        }
    }
}

/// Raster fetching.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    /// Worker threads fetching rasters (`None` = 4 × CPU count).
    pub max_concurrent: Option<usize>,
    /// Required elevation raster edge length in pixels (`None` = any size).
    pub expected_elevation_size: Option<u32>,
    /// Required colour raster edge length in pixels (`None` = any size).
    pub expected_color_size: Option<u32>,
}

/// Where tile images live on disk: `<tile_root>/<dir>/<z>/<x>/<y>.<ext>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProviderConfig {
    /// Root of the tile tree.
    pub tile_root: PathBuf,
    /// Subdirectory holding Terrain-RGB elevation tiles.
    pub elevation_dir: String,
    /// Subdirectory holding colour imagery.
    pub color_dir: String,
    /// File extension of elevation tiles.
    pub elevation_extension: String,
    /// File extension of colour tiles.
    pub color_extension: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            tile_root: PathBuf::from("tiles"),
            elevation_dir: "elevation".to_string(),
            color_dir: "color".to_string(),
            elevation_extension: "png".to_string(),
            color_extension: "jpg".to_string(),
        }
    }
}

/// Default viewpoint, in degrees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewerConfig {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lon: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            lat: -38.85,
            lon: 143.51,
        }
    }
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// The per-user directory holding `config.ron` (e.g. `~/.config/hollow`).
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join("hollow"))
        .ok_or(ConfigError::NoConfigDir)
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let config = Self::read(&config_path)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(|source| ConfigError::WriteError {
            path: config_dir.to_path_buf(),
            source,
        })?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .enumerate_arrays(false);
        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(|source| ConfigError::WriteError {
            path: config_path.clone(),
            source,
        })?;
        log::debug!("Saved config to {}", config_path.display());
        Ok(())
    }

    /// Re-read `config.ron`: `Some(new_config)` if it differs from `self`,
    /// `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let new_config = Self::read(&config_dir.join(CONFIG_FILE))?;
        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        })?;
        ron::from_str(&contents).map_err(ConfigError::ParseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = Config::default();
        let ron_str =
            ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::new().depth_limit(3))
                .unwrap();
        assert!(ron_str.contains("radius_km: 6371.0"), "{ron_str}");
        assert!(ron_str.contains("max_level: 12"), "{ron_str}");
        assert!(ron_str.contains("max_concurrent: None"), "{ron_str}");
    }

    #[test]
    fn test_config_roundtrip() {
        let mut config = Config::default();
        config.fetch.max_concurrent = Some(8);
        config.provider.tile_root = PathBuf::from("/srv/tiles");
        let ron_str = ron::to_string(&config).unwrap();
        let deserialized: Config = ron::from_str(&ron_str).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn test_missing_section_uses_default() {
        let ron_str = "(tiling: (max_level: 14))";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config.tiling.max_level, 14);
        assert_eq!(config.tiling.min_level, 6);
        assert_eq!(config.mesh, MeshConfig::default());
        assert_eq!(config.viewer, ViewerConfig::default());
    }

    #[test]
    fn test_extra_field_ignored() {
        let result: Result<Config, _> = ron::from_str("(atmosphere: (enabled: true))");
        assert!(result.is_ok());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.tiling.subdivision_factor = 3.5;
        config.elevation.exaggeration = 1.0;
        config.provider.color_extension = "webp".to_string();

        config.save(dir.path()).unwrap();
        let loaded = Config::load_or_create(dir.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let config = Config::load_or_create(&nested).unwrap();
        assert_eq!(config, Config::default());
        assert!(nested.join(CONFIG_FILE).exists());
    }

    #[test]
    fn test_reload_detects_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();

        let mut modified = config.clone();
        modified.viewer.lat = 10.0;
        modified.save(dir.path()).unwrap();

        let result = config.reload(dir.path()).unwrap();
        assert_eq!(result.map(|c| c.viewer.lat), Some(10.0));
    }

    #[test]
    fn test_reload_no_changes() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::default();
        config.save(dir.path()).unwrap();
        assert!(config.reload(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_reload_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::default().reload(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }), "{err}");
    }

    #[test]
    fn test_invalid_ron_produces_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{{not valid}}").unwrap();
        let err = Config::load_or_create(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)), "{err}");
    }

    #[test]
    fn test_ron_comments_accepted() {
        let ron_str = "// hollow config\n(\n  // nothing overridden\n)";
        let config: Config = ron::from_str(ron_str).unwrap();
        assert_eq!(config, Config::default());
    }
}
