//! The immutable parameter value threaded through a tiling pass.

use hollow_config::Config;
use hollow_mesh::{ElevationParams, MeshParams};
use hollow_tiles::SelectionParams;

use crate::EngineError;

/// Worker pool sizing and raster shape checks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FetchParams {
    /// Worker threads (`None` = 4 × CPU count).
    pub max_concurrent: Option<usize>,
    /// Required elevation raster edge length (`None` = any).
    pub expected_elevation_size: Option<u32>,
    /// Required colour raster edge length (`None` = any).
    pub expected_color_size: Option<u32>,
}

impl FetchParams {
    /// Threads to spawn for `tiles` fetches: never more than there are tiles.
    #[must_use]
    pub fn worker_count(&self, tiles: usize) -> usize {
        let limit = self
            .max_concurrent
            .unwrap_or_else(|| num_cpus::get() * 4)
            .max(1);
        limit.min(tiles)
    }
}

/// Everything a pass needs. Built once, never mutated by the engine.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TilingParams {
    /// Quadtree selection.
    pub selection: SelectionParams,
    /// Mesh construction.
    pub mesh: MeshParams,
    /// Raster fetching.
    pub fetch: FetchParams,
}

impl TilingParams {
    /// Check every section.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.selection.validate()?;
        self.mesh.validate()?;
        if self.fetch.max_concurrent == Some(0) {
            return Err(EngineError::NoWorkers);
        }
        Ok(())
    }
}

impl From<&Config> for TilingParams {
    fn from(config: &Config) -> Self {
        Self {
            selection: SelectionParams {
                min_level: config.tiling.min_level,
                max_level: config.tiling.max_level,
                subdivision_factor: config.tiling.subdivision_factor,
                max_radius_km: config.tiling.max_radius_km,
            },
            mesh: MeshParams {
                planet_radius_km: config.planet.radius_km,
                surface_offset_km: config.planet.surface_offset_km,
                min_segments: config.mesh.min_segments,
                max_segments: config.mesh.max_segments,
                reference_level: config.mesh.reference_level,
                elevation: ElevationParams {
                    exaggeration: config.elevation.exaggeration,
                    ocean_floor_m: config.elevation.ocean_floor_m,
                },
                skirt_depth_km: config.mesh.skirt_depth_km,
            },
            fetch: FetchParams {
                max_concurrent: config.fetch.max_concurrent,
                expected_elevation_size: config.fetch.expected_elevation_size,
                expected_color_size: config.fetch.expected_color_size,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_config_defaults() {
        let params = TilingParams::from(&Config::default());
        assert_eq!(params, TilingParams::default());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_config_values_flow_through() {
        let mut config = Config::default();
        config.tiling.max_level = 14;
        config.elevation.exaggeration = 1.5;
        config.mesh.skirt_depth_km = 0.0;
        config.fetch.max_concurrent = Some(2);
        let params = TilingParams::from(&config);
        assert_eq!(params.selection.max_level, 14);
        assert_eq!(params.mesh.elevation.exaggeration, 1.5);
        assert_eq!(params.mesh.skirt_depth_km, 0.0);
        assert_eq!(params.fetch.max_concurrent, Some(2));
    }

    #[test]
    fn test_validate_rejects_bad_sections() {
        let mut params = TilingParams::default();
        params.selection.min_level = 13;
        assert!(matches!(params.validate(), Err(EngineError::Selection(_))));

        let mut params = TilingParams::default();
        params.mesh.max_segments = 0;
        assert!(matches!(params.validate(), Err(EngineError::Mesh(_))));

        let mut params = TilingParams::default();
        params.fetch.max_concurrent = Some(0);
        assert!(matches!(params.validate(), Err(EngineError::NoWorkers)));
    }

    #[test]
    fn test_worker_count() {
        let fetch = FetchParams {
            max_concurrent: Some(8),
            ..FetchParams::default()
        };
        assert_eq!(fetch.worker_count(100), 8);
        assert_eq!(fetch.worker_count(3), 3);
        assert_eq!(fetch.worker_count(0), 0);
        assert!(FetchParams::default().worker_count(1000) >= 4);
    }
}
