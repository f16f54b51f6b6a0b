//! Error types for the fallible edges of the crate.
//!
//! Playback itself never fails; only loading settings from disk can.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading a settings snapshot.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The settings file could not be read.
    #[error("failed to read settings file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The settings file is not valid TOML for [`crate::PacingSettings`].
    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),
}
