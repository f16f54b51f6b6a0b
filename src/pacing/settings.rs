//! Settings snapshot consumed by the delay model and the engine.
//!
//! Snapshots are immutable once handed to the engine; updates replace the
//! whole `Arc<PacingSettings>`. No range validation happens here beyond
//! what keeps the arithmetic finite.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Per-rule micropause multipliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Micropauses {
    /// Master switch for all content-aware pauses.
    pub enabled: bool,
    /// Callout marker (`[CALLOUT:kind]`).
    pub callout: f64,
    /// Section enumerator (`1.`, `IV.`, `b.`).
    pub section: f64,
    /// List bullet (`-`, `*`, `+`, `•`).
    pub list_item: f64,
    /// Sentence-ending punctuation (`.`, `!`, `?`).
    pub sentence_end: f64,
    /// Clause punctuation (`;`, `:`, `,`).
    pub clause_end: f64,
    /// Token containing a digit.
    pub number: f64,
    /// Token longer than `long_word_threshold`.
    pub long_word: f64,
    /// Length (in graphemes) above which the long-word rule applies.
    pub long_word_threshold: usize,
    /// Token carrying a paragraph break.
    pub paragraph: f64,
}

impl Default for Micropauses {
    fn default() -> Self {
        Self {
            enabled: true,
            callout: 2.0,
            section: 1.5,
            list_item: 1.3,
            sentence_end: 2.0,
            clause_end: 1.5,
            number: 1.8,
            long_word: 1.4,
            long_word_threshold: 8,
            paragraph: 2.5,
        }
    }
}

/// Acceleration ramp from `start_wpm` to `target_wpm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Acceleration {
    /// Whether the ramp drives the effective rate.
    pub enabled: bool,
    /// Rate at the start of played time.
    pub start_wpm: f64,
    /// Rate reached once `duration_secs` of played time has elapsed.
    pub target_wpm: f64,
    /// Ramp length in seconds of played (unpaused) time.
    pub duration_secs: f64,
}

impl Acceleration {
    /// Ramp length as a [`Duration`] (zero for negative or invalid values).
    pub fn duration(&self) -> Duration {
        Duration::try_from_secs_f64(self.duration_secs).unwrap_or(Duration::ZERO)
    }
}

impl Default for Acceleration {
    fn default() -> Self {
        Self {
            enabled: false,
            start_wpm: 200.0,
            target_wpm: 400.0,
            duration_secs: 30.0,
        }
    }
}

/// Complete pacing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingSettings {
    /// Base reading rate in words per minute.
    pub wpm: f64,
    /// Tokens emitted per tick.
    pub chunk_size: usize,
    /// Ease-in over the first tokens of each session.
    pub slow_start: bool,
    /// Content-aware pause multipliers.
    pub micropauses: Micropauses,
    /// Rate ramp over played time.
    pub acceleration: Acceleration,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            wpm: 300.0,
            chunk_size: 1,
            slow_start: true,
            micropauses: Micropauses::default(),
            acceleration: Acceleration::default(),
        }
    }
}

impl PacingSettings {
    /// Parse a snapshot from TOML; missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// Read and parse a TOML settings file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&source)
    }

    /// Set the base rate.
    #[must_use]
    pub const fn with_wpm(mut self, wpm: f64) -> Self {
        self.wpm = wpm;
        self
    }

    /// Set the chunk size.
    #[must_use]
    pub const fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Toggle the slow-start ramp.
    #[must_use]
    pub const fn with_slow_start(mut self, enabled: bool) -> Self {
        self.slow_start = enabled;
        self
    }

    /// Toggle all micropauses.
    #[must_use]
    pub const fn with_micropauses(mut self, enabled: bool) -> Self {
        self.micropauses.enabled = enabled;
        self
    }

    /// Configure and enable the acceleration ramp.
    #[must_use]
    pub const fn with_acceleration(mut self, start_wpm: f64, target_wpm: f64, duration_secs: f64) -> Self {
        self.acceleration = Acceleration {
            enabled: true,
            start_wpm,
            target_wpm,
            duration_secs,
        };
        self
    }

    /// Chunk size with the `>= 1` invariant applied.
    pub fn effective_chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }
}
