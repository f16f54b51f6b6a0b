//! Actor Model: message-passing playback over crossbeam channels.
//!
//! - **Pacing Engine**: deterministic state machine, driven by a [`Clock`](crate::Clock)
//! - **Player**: owns an engine on its own thread and fires its ticks in real time
//! - **Controller / Renderer**: the application, on either side of the player
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  PlaybackCommand   ┌──────────────────┐
//! │  Controller  │ ─────────────────▶ │  Player Thread   │
//! └──────────────┘                    │  ┌────────────┐  │
//!                                     │  │PacingEngine│  │
//! ┌──────────────┐   PlaybackEvent    │  └────────────┘  │
//! │   Renderer   │ ◀───────────────── │   select! timer  │
//! └──────────────┘                    └──────────────────┘
//! ```

mod engine;
mod messages;
mod player;

pub use engine::{PacingEngine, PendingTick, PlaybackState};
pub use messages::{Chunk, EngineState, PlaybackCommand, PlaybackEvent, PlaybackStatus};
pub use player::{Player, PlayerConfig};
