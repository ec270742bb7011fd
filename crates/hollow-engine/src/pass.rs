//! One tiling pass: select leaves, fetch their rasters in parallel, and
//! build a mesh per tile.
//!
//! Fetches run on a pool of scoped worker threads fed through a crossbeam
//! channel. Each job carries its position in the leaf list, so results are
//! put back into selection order no matter which worker finished first.
//! A failed tile is recorded and skipped; it never aborts the pass.

use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::{Duration, Instant};

use crossbeam_channel::unbounded;
use hollow_mesh::{Raster, TileMesh, build_tile_mesh};
use hollow_tiles::{GeoBounds, GeoPoint, LeafTileSet, QuadtreeNode, QuadtreeSelector, TileAddress};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::{EngineError, FetchError, RasterProvider, TileFailure, TilingParams};

/// A finished tile, ready for upload by the renderer.
#[derive(Clone, Debug)]
pub struct RenderableTile {
    /// Which tile this is.
    pub address: TileAddress,
    /// Its geographic extent.
    pub bounds: GeoBounds,
    /// Displaced grid plus skirts.
    pub mesh: TileMesh,
    /// Surface texture for `mesh`.
    pub color: Raster,
}

/// Everything one pass produced.
#[derive(Debug)]
pub struct TilingOutput {
    /// Viewer the pass was computed for.
    pub viewer: GeoPoint,
    /// Leaves the selector asked for.
    pub requested: usize,
    /// Successful tiles, in selection order.
    pub tiles: Vec<RenderableTile>,
    /// Dropped tiles, in selection order.
    pub failures: Vec<TileFailure>,
    /// Wall time of the whole pass.
    pub elapsed: Duration,
}

impl TilingOutput {
    /// Vertices over all tiles, skirts included.
    pub fn total_vertices(&self) -> usize {
        self.tiles.iter().map(|t| t.mesh.vertex_count()).sum()
    }

    /// Triangles over all tiles, skirts included.
    pub fn total_triangles(&self) -> usize {
        self.tiles.iter().map(|t| t.mesh.triangle_count()).sum()
    }

    /// Built tiles per level.
    pub fn level_histogram(&self) -> BTreeMap<u8, usize> {
        let mut histogram = BTreeMap::new();
        for tile in &self.tiles {
            *histogram.entry(tile.address.level).or_insert(0) += 1;
        }
        histogram
    }

    /// A serialisable digest of the pass.
    pub fn summary(&self) -> PassSummary {
        PassSummary {
            viewer_lat: self.viewer.lat,
            viewer_lon: self.viewer.lon,
            requested: self.requested,
            built: self.tiles.len(),
            failed: self.failures.len(),
            total_vertices: self.total_vertices(),
            total_triangles: self.total_triangles(),
            elapsed_ms: self.elapsed.as_secs_f64() * 1000.0,
            tiles_per_level: self.level_histogram(),
            failures: self
                .failures
                .iter()
                .map(|f| format!("{}: {}", f.address, f.error))
                .collect(),
        }
    }
}

/// Pass statistics written by the CLI as JSON.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PassSummary {
    /// Viewer latitude.
    pub viewer_lat: f64,
    /// Viewer longitude.
    pub viewer_lon: f64,
    /// Leaves selected.
    pub requested: usize,
    /// Tiles meshed.
    pub built: usize,
    /// Tiles dropped.
    pub failed: usize,
    /// Vertices over all tiles.
    pub total_vertices: usize,
    /// Triangles over all tiles.
    pub total_triangles: usize,
    /// Pass wall time in milliseconds.
    pub elapsed_ms: f64,
    /// Built tiles per level.
    pub tiles_per_level: BTreeMap<u8, usize>,
    /// `"z/x/y: reason"` for each dropped tile.
    pub failures: Vec<String>,
}

/// Runs tiling passes with a fixed parameter set.
#[derive(Clone, Debug)]
pub struct TilingEngine {
    params: TilingParams,
    selector: QuadtreeSelector,
}

impl TilingEngine {
    /// Validate `params` and build an engine around them.
    pub fn new(params: TilingParams) -> Result<Self, EngineError> {
        params.validate()?;
        let selector = QuadtreeSelector::new(params.selection)?;
        Ok(Self { params, selector })
    }

    /// The parameters this engine was built with.
    pub fn params(&self) -> &TilingParams {
        &self.params
    }

    /// Leaf tiles for `viewer`, without fetching anything.
    pub fn select(&self, viewer: GeoPoint) -> LeafTileSet {
        self.selector.select(viewer)
    }

    /// Select, fetch and mesh every leaf tile around `viewer`.
    ///
    /// The viewer must satisfy [`GeoPoint::new`]'s range checks.
    pub fn run_pass(&self, viewer: GeoPoint, provider: &dyn RasterProvider) -> TilingOutput {
        let start = Instant::now();
        let leaves = self.select(viewer);
        let (tiles, failures) = self.build_tiles(leaves.nodes(), provider);
        let output = TilingOutput {
            viewer,
            requested: leaves.len(),
            tiles,
            failures,
            elapsed: start.elapsed(),
        };

        info!(
            lat = viewer.lat,
            lon = viewer.lon,
            requested = output.requested,
            built = output.tiles.len(),
            failed = output.failures.len(),
            vertices = output.total_vertices(),
            elapsed_ms = output.elapsed.as_millis() as u64,
            "tiling pass complete"
        );
        output
    }

    /// Fetch and mesh `nodes` on the worker pool.
    ///
    /// Both returned lists follow the order of `nodes`.
    pub fn build_tiles(
        &self,
        nodes: &[QuadtreeNode],
        provider: &dyn RasterProvider,
    ) -> (Vec<RenderableTile>, Vec<TileFailure>) {
        let workers = self.params.fetch.worker_count(nodes.len());

        let (job_tx, job_rx) = unbounded::<(usize, QuadtreeNode)>();
        let (result_tx, result_rx) = unbounded();
        for job in nodes.iter().copied().enumerate() {
            let _ = job_tx.send(job);
        }
        drop(job_tx);

        std::thread::scope(|scope| {
            for i in 0..workers {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                let spawned = std::thread::Builder::new()
                    .name(format!("tile-fetch-{i}"))
                    .spawn_scoped(scope, move || {
                        while let Ok((index, node)) = jobs.recv() {
                            let outcome = self.build_tile(&node, provider);
                            if results.send((index, node.address, outcome)).is_err() {
                                break;
                            }
                        }
                    });
                if let Err(err) = spawned {
                    warn!(%err, "failed to spawn tile fetch worker");
                }
            }
        });

        // Anything left over had no worker to run on; build it here.
        while let Ok((index, node)) = job_rx.try_recv() {
            let _ = result_tx.send((index, node.address, self.build_tile(&node, provider)));
        }
        drop(result_tx);

        let mut outcomes: Vec<_> = result_rx.iter().collect();
        outcomes.sort_unstable_by_key(|(index, _, _)| *index);

        let mut tiles = Vec::with_capacity(outcomes.len());
        let mut failures = Vec::new();
        for (_, address, outcome) in outcomes {
            match outcome {
                Ok(tile) => tiles.push(tile),
                Err(error) => {
                    warn!(tile = %address, %error, "dropping tile");
                    failures.push(TileFailure { address, error });
                }
            }
        }
        (tiles, failures)
    }

    fn build_tile(
        &self,
        node: &QuadtreeNode,
        provider: &dyn RasterProvider,
    ) -> Result<RenderableTile, FetchError> {
        let rasters = catch_unwind(AssertUnwindSafe(|| provider.fetch_tile(node.address)))
            .map_err(|_| FetchError::Provider("raster provider panicked".to_string()))??;

        let fetch = &self.params.fetch;
        rasters.check_sizes(fetch.expected_elevation_size, fetch.expected_color_size)?;

        let mesh = build_tile_mesh(node, &rasters.elevation, &self.params.mesh);
        debug!(
            tile = %node.address,
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            "tile meshed"
        );
        Ok(RenderableTile {
            address: node.address,
            bounds: node.bounds,
            mesh,
            color: rasters.color,
        })
    }
}
