//! Remaining-time estimation by replaying the delay model.
//!
//! The multiplier chain depends on content, so there is no closed form.
//! The estimator walks chunk by chunk from the query position, advancing the
//! ramp state exactly as playback would. Cost is O(remaining tokens).

use super::delay::chunk_delay_ms;
use super::ramp::RampState;
use super::settings::PacingSettings;
use crate::text::Token;
use std::time::Duration;

/// Convert a millisecond delay into a [`Duration`], treating bad values as zero.
pub fn delay_from_ms(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or(Duration::ZERO)
}

/// Per-chunk delays from `from` to the end of `tokens`.
pub fn chunk_delays(
    tokens: &[Token],
    from: usize,
    settings: &PacingSettings,
    ramp: RampState,
) -> Vec<Duration> {
    let chunk_size = settings.effective_chunk_size();
    let mut ramp = ramp;
    tokens
        .get(from..)
        .unwrap_or_default()
        .chunks(chunk_size)
        .map(|chunk| {
            let delay = delay_from_ms(chunk_delay_ms(chunk, settings, &ramp));
            ramp.advance(delay);
            delay
        })
        .collect()
}

/// Total time to play from `from` to the end.
pub fn remaining(tokens: &[Token], from: usize, settings: &PacingSettings, ramp: RampState) -> Duration {
    chunk_delays(tokens, from, settings, ramp).into_iter().sum()
}
