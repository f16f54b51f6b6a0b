//! Message types for playback communication.
//!
//! These types define the protocol between the playback actor, its
//! controller (keyboard handler, navigation UI) and the renderer.

use crate::pacing::PacingSettings;
use crate::structure::{BreadcrumbContext, Document};
use crate::text::Token;
use crossbeam_channel::Sender;
use std::sync::Arc;
use std::time::Duration;

/// Lifecycle of the pacing engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EngineState {
    /// Nothing (or nothing readable) loaded.
    #[default]
    Idle,
    /// A document is loaded and playback has not started.
    Loaded,
    /// Chunks are being emitted on a timer.
    Playing,
    /// Playback suspended; the position is kept.
    Paused,
    /// The last chunk was emitted.
    Completed,
}

/// One paced emission.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// Index of the first token in the chunk.
    pub start_index: usize,
    /// Up to `chunk_size` consecutive tokens.
    pub tokens: Vec<Token>,
    /// Location context for `start_index`.
    pub breadcrumb: BreadcrumbContext,
    /// Whether this chunk reaches the end of the document.
    pub is_final: bool,
    /// Time until the next chunk; `None` for previews shown while not playing.
    pub delay: Option<Duration>,
}

impl Chunk {
    /// Display text of the chunk's tokens joined by spaces.
    pub fn display_text(&self) -> String {
        self.tokens
            .iter()
            .map(Token::display_text)
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Events from the engine to the renderer.
#[derive(Debug, Clone)]
pub enum PlaybackEvent {
    /// A new document replaced the previous one.
    Loaded(Document),

    /// A chunk to display.
    Chunk(Chunk),

    /// The engine changed state.
    StateChanged(EngineState),

    /// Playback reached the end of the document.
    Completed,
}

/// Snapshot of every engine getter at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackStatus {
    /// Engine state.
    pub state: EngineState,
    /// Index of the next token to emit.
    pub current_index: usize,
    /// Tokens in the loaded document.
    pub token_count: usize,
    /// `current_index / token_count`, 0 when empty.
    pub progress: f64,
    /// Played seconds in the current session, pauses excluded.
    pub elapsed_secs: f64,
    /// Estimated seconds to the end at the current settings.
    pub remaining_secs: f64,
    /// Effective words per minute right now.
    pub wpm: f64,
}

/// Commands sent to the playback actor.
#[derive(Debug)]
pub enum PlaybackCommand {
    /// Replace the document with marker-normalized text.
    Load {
        /// Source text.
        text: String,
        /// Optional starting token offset (clamped).
        start_index: Option<usize>,
    },

    /// Replace the document with Markdown source.
    LoadMarkdown {
        /// Markdown source.
        source: String,
        /// Optional starting token offset (clamped).
        start_index: Option<usize>,
    },

    /// Start or resume playback.
    Play,

    /// Suspend playback.
    Pause,

    /// Rewind to the start and end the session.
    Stop,

    /// Move by a signed number of tokens (clamped).
    Seek(isize),

    /// Swap in a new settings snapshot from the next tick on.
    UpdateSettings(Arc<PacingSettings>),

    /// Request a status snapshot.
    Status(Sender<PlaybackStatus>),

    /// Shutdown the playback thread.
    Shutdown,
}
