//! `hollow`: run one tiling pass against a directory of tiles and report it.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use hollow_config::{CliArgs, Config, default_config_dir};
use hollow_engine::{DirectoryRasterProvider, EngineError, TilingEngine, TilingParams};
use hollow_tiles::{GeoPoint, TileError};
use tracing::{error, info};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid viewer location: {0}")]
    Viewer(#[from] TileError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to encode summary: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write summary to {}: {source}", path.display())]
    WriteSummary {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args.config.clone().unwrap_or_else(|| {
        default_config_dir().unwrap_or_else(|e| {
            eprintln!("{e}, using ./.hollow");
            PathBuf::from(".hollow")
        })
    });

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    if let Some(log_file) =
        hollow_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config))
    {
        info!(path = %log_file.display(), "writing JSON log");
    }

    match run(&config, args.summary.as_deref()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, summary_path: Option<&Path>) -> Result<(), CliError> {
    let viewer = GeoPoint::new(config.viewer.lat, config.viewer.lon)?;
    let engine = TilingEngine::new(TilingParams::from(config))?;
    let provider = DirectoryRasterProvider::from_config(&config.provider);

    info!(
        lat = viewer.lat,
        lon = viewer.lon,
        root = %provider.root().display(),
        "starting tiling pass"
    );
    let output = engine.run_pass(viewer, &provider);

    for (level, count) in output.level_histogram() {
        info!(level, count, "tiles built");
    }
    if !output.failures.is_empty() {
        info!(failed = output.failures.len(), "tiles dropped, see warnings above");
    }

    if let Some(path) = summary_path {
        let json = serde_json::to_string_pretty(&output.summary())?;
        std::fs::write(path, json).map_err(|source| CliError::WriteSummary {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "wrote pass summary");
    }
    Ok(())
}
