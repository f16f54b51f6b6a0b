//! Ramp Controller: slow-start ease-in and acceleration toward a target rate.
//!
//! The two ramps compose. Acceleration changes the rate feeding the base
//! interval; slow start multiplies the resulting delay.

use super::settings::PacingSettings;
use std::time::Duration;

/// Number of ticks the slow-start ramp spans.
pub const SLOW_START_TOKENS: u64 = 5;

/// Session progress the ramps depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RampState {
    /// Ticks emitted since the session started.
    pub tokens_consumed: u64,
    /// Played time since the session started, pauses excluded.
    pub elapsed: Duration,
}

impl RampState {
    /// Create a ramp state.
    pub const fn new(tokens_consumed: u64, elapsed: Duration) -> Self {
        Self {
            tokens_consumed,
            elapsed,
        }
    }

    /// Slow-start factor: `1 + (K - consumed) / K` for the first `K` ticks.
    #[allow(clippy::cast_precision_loss)]
    pub fn slow_start_multiplier(&self, settings: &PacingSettings) -> f64 {
        if !settings.slow_start || self.tokens_consumed >= SLOW_START_TOKENS {
            return 1.0;
        }
        let remaining = (SLOW_START_TOKENS - self.tokens_consumed) as f64;
        1.0 + remaining / SLOW_START_TOKENS as f64
    }

    /// Effective rate after the acceleration ramp.
    pub fn effective_wpm(&self, settings: &PacingSettings) -> f64 {
        let accel = &settings.acceleration;
        if !accel.enabled {
            return settings.wpm;
        }

        let duration = accel.duration();
        if duration.is_zero() || self.elapsed >= duration {
            return accel.target_wpm;
        }

        let progress = self.elapsed.as_secs_f64() / duration.as_secs_f64();
        (accel.target_wpm - accel.start_wpm).mul_add(progress, accel.start_wpm)
    }

    /// Record one emitted tick followed by `delay` of played time.
    pub fn advance(&mut self, delay: Duration) {
        self.tokens_consumed += 1;
        self.elapsed += delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_slow_start_decay() {
        let settings = PacingSettings::default();
        let at = |consumed| RampState::new(consumed, Duration::ZERO).slow_start_multiplier(&settings);
        assert!(approx(at(0), 2.0));
        assert!(approx(at(4), 1.2));
        assert!(approx(at(5), 1.0));
        assert!(approx(at(50), 1.0));
    }

    #[test]
    fn test_slow_start_disabled() {
        let settings = PacingSettings::default().with_slow_start(false);
        assert!(approx(RampState::default().slow_start_multiplier(&settings), 1.0));
    }

    #[test]
    fn test_acceleration_interpolates() {
        let settings = PacingSettings::default().with_acceleration(200.0, 600.0, 30.0);
        let at = |secs| RampState::new(0, Duration::from_secs(secs)).effective_wpm(&settings);
        assert!(approx(at(0), 200.0));
        assert!(approx(at(15), 400.0));
        assert!(approx(at(40), 600.0));
    }

    #[test]
    fn test_acceleration_disabled_uses_base() {
        let settings = PacingSettings::default().with_wpm(350.0);
        let ramp = RampState::new(0, Duration::from_secs(100));
        assert!(approx(ramp.effective_wpm(&settings), 350.0));
    }

    #[test]
    fn test_zero_duration_jumps_to_target() {
        let settings = PacingSettings::default().with_acceleration(200.0, 500.0, 0.0);
        assert!(approx(RampState::default().effective_wpm(&settings), 500.0));
    }

    #[test]
    fn test_advance() {
        let mut ramp = RampState::default();
        ramp.advance(Duration::from_millis(200));
        ramp.advance(Duration::from_millis(300));
        assert_eq!(ramp, RampState::new(2, Duration::from_millis(500)));
    }
}
