//! Pacing: the delay model behind every emitted chunk.
//!
//! ```text
//! delay = 60000 / effective_wpm  ×  delay_multiplier(chunk)  ×  slow_start
//!          └── acceleration ramp     └── content rules          └── ease-in
//! ```

pub mod delay;
pub mod estimate;
pub mod ramp;
mod settings;

pub use delay::{delay_multiplier, TokenFeatures, HEADING_MULTIPLIERS};
pub use ramp::{RampState, SLOW_START_TOKENS};
pub use settings::{Acceleration, Micropauses, PacingSettings};
