//! Errors raised while locating, reading, or writing `config.ron`.

use std::path::PathBuf;

/// Configuration failures. None of these reach the tiling pass; the binary
/// reports them and exits before any tile is selected.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The platform has no per-user configuration directory.
    #[error("no user configuration directory on this platform")]
    NoConfigDir,

    /// Reading `config.ron` failed.
    #[error("failed to read {path}: {source}")]
    ReadError {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Creating the directory or writing `config.ron` failed.
    #[error("failed to write {path}: {source}")]
    WriteError {
        /// File or directory that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid RON for [`crate::Config`].
    #[error("failed to parse config: {0}")]
    ParseError(#[source] ron::error::SpannedError),

    /// The config could not be rendered as RON.
    #[error("failed to serialize config: {0}")]
    SerializeError(#[source] ron::Error),
}
