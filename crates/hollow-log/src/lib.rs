//! Tracing subscriber setup for the hollow tiler.
//!
//! Library crates only emit `tracing` events; this crate installs the
//! subscriber that prints them. Console output carries the uptime and the
//! thread name, so events from the raster fetch workers can be told apart.
//! Debug builds additionally write JSON lines to `hollow.log`.

use std::path::{Path, PathBuf};

use hollow_config::Config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Name of the JSON log file written in debug builds.
pub const LOG_FILE_NAME: &str = "hollow.log";

const DEFAULT_DIRECTIVES: &str = "info";

/// Filter directives used when `RUST_LOG` is not set: the configured
/// `debug.log_level` if non-empty, otherwise `"info"`.
#[must_use]
pub fn filter_directives(config: Option<&Config>) -> String {
    match config {
        Some(config) if !config.debug.log_level.trim().is_empty() => {
            config.debug.log_level.trim().to_string()
        }
        _ => DEFAULT_DIRECTIVES.to_string(),
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over [`filter_directives`]. When
/// `debug_build` is set and `log_dir` can be created, a JSON file layer is
/// added and the path of the log file is returned.
///
/// Calling this twice panics inside `tracing-subscriber`; the binary calls it
/// once at startup.
///
/// ```no_run
/// use hollow_config::Config;
/// use hollow_log::init_logging;
///
/// let config = Config::default();
/// init_logging(Some(std::path::Path::new("./logs")), true, Some(&config));
/// ```
pub fn init_logging(
    log_dir: Option<&Path>,
    debug_build: bool,
    config: Option<&Config>,
) -> Option<PathBuf> {
    let directives = filter_directives(config);
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&directives));

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer);

    if debug_build
        && let Some(log_dir) = log_dir
        && std::fs::create_dir_all(log_dir).is_ok()
    {
        let log_path = log_dir.join(LOG_FILE_NAME);
        if let Ok(log_file) = std::fs::File::create(&log_path) {
            let file_layer = fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(true)
                .with_thread_names(true)
                .with_timer(fmt::time::uptime())
                .json();

            subscriber.with(file_layer).init();
            return Some(log_path);
        }
    }

    subscriber.init();
    None
}

/// An `EnvFilter` with the default directives.
pub fn default_env_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_DIRECTIVES)
}
