//! # Cadence
//!
//! Adaptive token pacing and breadcrumb tracking for speed-reading
//! structured text.
//!
//! Cadence presents a document a few words at a time at a configurable
//! reading rate, pausing longer on structurally significant tokens and
//! always knowing which heading the reader is under.
//!
//! ## Core Concepts
//!
//! - **Marker convention**: `[H1]`..`[H6]` and `[CALLOUT:kind]` prefixes carry structure through plain text
//! - **Landmarks**: headings and callouts indexed once per load
//! - **Breadcrumbs**: the heading ancestry of any token position
//! - **Pacing engine**: a clock-driven state machine emitting chunks with content-aware delays
//! - **Actor model**: a playback thread fires ticks and streams events to the renderer
//!
//! ## Example
//!
//! ```rust,ignore
//! use cadence::{PacingSettings, Player, PlaybackEvent};
//! use std::sync::Arc;
//!
//! let player = Player::spawn(Arc::new(PacingSettings::default()))?;
//! player.load_markdown("# Intro\nHello world.", None);
//! player.play();
//!
//! while let Ok(event) = player.events().recv() {
//!     if let PlaybackEvent::Chunk(chunk) = event {
//!         println!("{} | {}", chunk.breadcrumb.trail(40), chunk.display_text());
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod actor;
pub mod clock;
pub mod error;
pub mod pacing;
pub mod structure;
pub mod text;

// Re-exports for convenience
pub use actor::{
    Chunk, EngineState, PacingEngine, PendingTick, PlaybackCommand, PlaybackEvent, PlaybackState,
    PlaybackStatus, Player, PlayerConfig,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::ConfigError;
pub use pacing::{delay_multiplier, Acceleration, Micropauses, PacingSettings, RampState};
pub use structure::{BreadcrumbContext, Document, Landmark, LandmarkKind};
pub use text::{segment, segment_markdown, Marker, Token};
