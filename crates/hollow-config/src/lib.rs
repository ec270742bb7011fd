//! Configuration for the hollow terrain tiler.
//!
//! Settings persist to disk as a RON file, can be overridden from the command
//! line via clap, and are reloadable. Every section uses `#[serde(default)]`,
//! so files written by older or newer builds still load.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    Config, DebugConfig, ElevationConfig, FetchConfig, MeshConfig, PlanetConfig, ProviderConfig,
    TilingConfig, ViewerConfig, default_config_dir,
};
pub use error::ConfigError;
