//! Command-line arguments for the `hollow` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Hollow terrain tiler command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "hollow", about = "Tile terrain for the inside of a hollow planet")]
pub struct CliArgs {
    /// Viewer latitude in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Viewer longitude in degrees.
    #[arg(long, allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Coarsest quadtree level.
    #[arg(long)]
    pub min_level: Option<u8>,

    /// Finest quadtree level.
    #[arg(long)]
    pub max_level: Option<u8>,

    /// Refine a tile while its center is closer than size × factor.
    #[arg(long)]
    pub subdivision_factor: Option<f64>,

    /// Area-of-interest radius in kilometres.
    #[arg(long)]
    pub max_radius_km: Option<f64>,

    /// Elevation exaggeration multiplier.
    #[arg(long)]
    pub exaggeration: Option<f64>,

    /// Root directory of the tile tree.
    #[arg(long)]
    pub tile_root: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a JSON summary of the pass to this file.
    #[arg(long)]
    pub summary: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(lat) = args.lat {
            self.viewer.lat = lat;
        }
        if let Some(lon) = args.lon {
            self.viewer.lon = lon;
        }
        if let Some(level) = args.min_level {
            self.tiling.min_level = level;
        }
        if let Some(level) = args.max_level {
            self.tiling.max_level = level;
        }
        if let Some(factor) = args.subdivision_factor {
            self.tiling.subdivision_factor = factor;
        }
        if let Some(radius) = args.max_radius_km {
            self.tiling.max_radius_km = radius;
        }
        if let Some(exaggeration) = args.exaggeration {
            self.elevation.exaggeration = exaggeration;
        }
        if let Some(ref root) = args.tile_root {
            self.provider.tile_root = root.clone();
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            lat: Some(51.5),
            lon: Some(-0.12),
            max_level: Some(14),
            tile_root: Some(PathBuf::from("/data/tiles")),
            ..CliArgs::default()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.viewer.lat, 51.5);
        assert_eq!(config.viewer.lon, -0.12);
        assert_eq!(config.tiling.max_level, 14);
        assert_eq!(config.provider.tile_root, PathBuf::from("/data/tiles"));
        // Non-overridden fields retain defaults
        assert_eq!(config.tiling.min_level, 6);
        assert_eq!(config.elevation.exaggeration, 3.0);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&CliArgs::default());
        assert_eq!(config, original);
    }

    #[test]
    fn test_parse_negative_coordinates() {
        let args = CliArgs::try_parse_from([
            "hollow",
            "--lat",
            "-38.85",
            "--lon",
            "143.51",
            "--subdivision-factor",
            "1.5",
            "--summary",
            "out.json",
        ])
        .unwrap();
        assert_eq!(args.lat, Some(-38.85));
        assert_eq!(args.lon, Some(143.51));
        assert_eq!(args.subdivision_factor, Some(1.5));
        assert_eq!(args.summary, Some(PathBuf::from("out.json")));
        assert_eq!(args.max_radius_km, None);
    }
}
