//! End-to-end tiling passes with in-memory raster providers.

use hollow_engine::{FetchError, FetchParams, TileRasters, TilingEngine, TilingParams};
use hollow_mesh::{PixelFormat, Raster};
use hollow_tiles::{GeoPoint, SelectionParams, TileAddress, great_circle_distance_km};

const SEA_LEVEL: [u8; 3] = [1, 134, 160];

fn viewer() -> GeoPoint {
    GeoPoint::new(-38.85, 143.51).unwrap()
}

fn rasters(elevation_size: u32) -> TileRasters {
    TileRasters {
        elevation: Raster::filled(elevation_size, elevation_size, PixelFormat::Rgb8, &SEA_LEVEL),
        color: Raster::filled(4, 4, PixelFormat::Rgba8, &[90, 120, 60, 255]),
    }
}

fn flat_provider(_: TileAddress) -> Result<TileRasters, FetchError> {
    Ok(rasters(8))
}

fn engine(selection: SelectionParams) -> TilingEngine {
    TilingEngine::new(TilingParams {
        selection,
        ..TilingParams::default()
    })
    .unwrap()
}

#[test]
fn test_victoria_scenario_detail_concentrates_near_viewer() {
    let engine = engine(SelectionParams {
        min_level: 6,
        max_level: 12,
        subdivision_factor: 2.0,
        max_radius_km: 800.0,
    });
    let leaves = engine.select(viewer());

    let finest = leaves.count_at_level(12);
    let coarsest = leaves.count_at_level(6);
    assert!(
        finest > coarsest,
        "level 12: {finest}, level 6: {coarsest}, histogram {:?}",
        leaves.level_histogram()
    );

    for node in &leaves {
        let distance = node.distance_km(viewer());
        assert!(
            distance <= 800.0 + node.size_km(),
            "{} lies {distance:.0} km from the viewer",
            node.address
        );
    }

    let output = engine.run_pass(viewer(), &flat_provider);
    assert_eq!(output.tiles.len(), leaves.len());
    assert!(output.failures.is_empty());
    assert!(output.total_triangles() > 0);
}

#[test]
fn test_single_failure_yields_n_minus_one_meshes() {
    let engine = engine(SelectionParams::default());
    let leaves = engine.select(viewer());
    let n = leaves.len();
    let victim = leaves.nodes()[n / 2].address;

    let provider = move |address: TileAddress| {
        if address == victim {
            Err(FetchError::Provider("connection reset".to_string()))
        } else {
            flat_provider(address)
        }
    };
    let output = engine.run_pass(viewer(), &provider);

    assert_eq!(output.requested, n);
    assert_eq!(output.tiles.len(), n - 1);
    assert_eq!(output.failures.len(), 1);
    assert_eq!(output.failures[0].address, victim);
    assert!(output.tiles.iter().all(|t| t.address != victim));

    let expected: Vec<_> = leaves
        .addresses()
        .into_iter()
        .filter(|&a| a != victim)
        .collect();
    let built: Vec<_> = output.tiles.iter().map(|t| t.address).collect();
    assert_eq!(built, expected);
}

#[test]
fn test_malformed_raster_is_a_failure() {
    let engine = TilingEngine::new(TilingParams {
        selection: SelectionParams {
            min_level: 5,
            max_level: 7,
            subdivision_factor: 2.0,
            max_radius_km: 300.0,
        },
        fetch: FetchParams {
            expected_elevation_size: Some(8),
            ..FetchParams::default()
        },
        ..TilingParams::default()
    })
    .unwrap();
    let leaves = engine.select(viewer());
    let victim = leaves.nodes()[0].address;

    let provider = move |address: TileAddress| {
        Ok(if address == victim {
            rasters(3)
        } else {
            rasters(8)
        })
    };
    let output = engine.run_pass(viewer(), &provider);

    assert_eq!(output.tiles.len(), leaves.len() - 1);
    assert_eq!(output.failures.len(), 1);
    assert!(matches!(output.failures[0].error, FetchError::Malformed(_)));
}

#[test]
fn test_leaves_cover_area_without_overlap() {
    let engine = engine(SelectionParams {
        min_level: 4,
        max_level: 8,
        subdivision_factor: 2.0,
        max_radius_km: 300.0,
    });
    let centre = viewer();
    let leaves = engine.select(centre);

    let addresses = leaves.addresses();
    for (i, a) in addresses.iter().enumerate() {
        for b in &addresses[i + 1..] {
            assert_ne!(a, b);
            assert!(!a.is_ancestor_of(b) && !b.is_ancestor_of(a), "{a} overlaps {b}");
        }
    }

    let mut checked = 0;
    for i in -12..=12 {
        for j in -16..=16 {
            let lat = centre.lat + i as f64 * 0.213;
            let lon = centre.lon + j as f64 * 0.277;
            if great_circle_distance_km(centre.lat, centre.lon, lat, lon) > 270.0 {
                continue;
            }
            let point = GeoPoint::new(lat, lon).unwrap();
            let covering = leaves.iter().filter(|n| n.bounds.contains(point)).count();
            assert_eq!(covering, 1, "({lat:.3}, {lon:.3}) covered {covering} times");
            checked += 1;
        }
    }
    assert!(checked > 100, "only {checked} sample points");
}

#[test]
fn test_larger_subdivision_factor_never_reduces_tiles() {
    let viewers = [
        (-38.85, 143.51),
        (0.0, 0.0),
        (60.0, -150.0),
        (-17.7, 179.5),
        (84.0, 10.0),
    ];
    for (lat, lon) in viewers {
        let viewer = GeoPoint::new(lat, lon).unwrap();
        for radius in [100.0, 300.0, 800.0] {
            let mut previous = 0;
            for step in 1..=60 {
                let factor = step as f64 * 0.1;
                let count = engine(SelectionParams {
                    min_level: 4,
                    max_level: 9,
                    subdivision_factor: factor,
                    max_radius_km: radius,
                })
                .select(viewer)
                .len();
                assert!(
                    count >= previous,
                    "viewer ({lat}, {lon}) radius {radius}: factor {factor:.1} gave {count} tiles, {previous} before"
                );
                previous = count;
            }
        }
    }
}

#[test]
fn test_summary_serializes_to_json() {
    let engine = engine(SelectionParams {
        min_level: 5,
        max_level: 7,
        subdivision_factor: 2.0,
        max_radius_km: 200.0,
    });
    let output = engine.run_pass(viewer(), &flat_provider);
    let json = serde_json::to_value(output.summary()).unwrap();

    assert_eq!(json["built"], output.tiles.len());
    assert_eq!(json["failed"], 0);
    assert_eq!(json["viewer_lat"], -38.85);
    assert!(json["tiles_per_level"].is_object());
}
