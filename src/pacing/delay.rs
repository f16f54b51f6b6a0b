//! Delay Calculator: content-aware multiplier for a token or chunk.
//!
//! Each matching rule contributes one factor and the factors multiply, so
//! the result does not depend on evaluation order. Every factor is floored
//! at 1.0; pacing only ever lengthens the base interval.

use super::ramp::RampState;
use super::settings::PacingSettings;
use crate::text::{Marker, Token};
use bitflags::bitflags;
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_segmentation::UnicodeSegmentation;

/// Heading pause by depth, `[H1]` first.
pub const HEADING_MULTIPLIERS: [f64; 6] = [3.0, 2.5, 2.0, 1.8, 1.6, 1.4];

/// Lowest rate the delay formula divides by.
pub const MIN_WPM: f64 = 1.0;

static SECTION_ENUMERATOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+|[IVXLCDM]+|[ivx]{1,4}|[A-Za-z])\.(?:\s|$)")
        .expect("section enumerator pattern")
});

const BULLETS: [char; 4] = ['-', '*', '+', '•'];
const SENTENCE_END: [char; 3] = ['.', '!', '?'];
const CLAUSE_END: [char; 3] = [';', ':', ','];
const CLOSERS: [char; 7] = ['"', '\'', ')', ']', '”', '’', '»'];

bitflags! {
    /// Content features detected in a token's text.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFeatures: u16 {
        /// Starts with a heading marker.
        const HEADING = 0b0000_0000_0001;
        /// Starts with a callout marker.
        const CALLOUT = 0b0000_0000_0010;
        /// Starts with a section enumerator.
        const SECTION = 0b0000_0000_0100;
        /// Starts with a list bullet.
        const LIST_ITEM = 0b0000_0000_1000;
        /// Ends with `.`, `!` or `?`.
        const SENTENCE_END = 0b0000_0001_0000;
        /// Ends with `;`, `:` or `,` (never together with `SENTENCE_END`).
        const CLAUSE_END = 0b0000_0010_0000;
        /// Contains a digit.
        const NUMBER = 0b0000_0100_0000;
        /// Has a word longer than the configured threshold.
        const LONG = 0b0000_1000_0000;
        /// Contains a line break.
        const PARAGRAPH = 0b0001_0000_0000;
    }
}

impl TokenFeatures {
    /// Detect the features of `text`.
    ///
    /// Content rules look at the text after its structural prefix, so the
    /// digit in `[H2]` does not count as a number.
    pub fn classify(text: &str, long_word_threshold: usize) -> (Self, Option<u8>) {
        let mut features = Self::empty();
        let mut heading_level = None;

        let body = match Marker::parse(text) {
            Some((Marker::Heading(level), len)) => {
                features |= Self::HEADING;
                heading_level = Some(level);
                &text[len..]
            }
            Some((Marker::Callout(_), len)) => {
                features |= Self::CALLOUT;
                &text[len..]
            }
            None => text,
        };

        if SECTION_ENUMERATOR.is_match(body) {
            features |= Self::SECTION;
        }
        if body.starts_with(BULLETS) {
            features |= Self::LIST_ITEM;
        }

        let tail = body.trim_end().trim_end_matches(CLOSERS);
        if tail.ends_with(SENTENCE_END) {
            features |= Self::SENTENCE_END;
        } else if tail.ends_with(CLAUSE_END) {
            features |= Self::CLAUSE_END;
        }

        if body.chars().any(|c| c.is_ascii_digit()) {
            features |= Self::NUMBER;
        }
        if body
            .split_whitespace()
            .any(|word| word.graphemes(true).count() > long_word_threshold)
        {
            features |= Self::LONG;
        }
        if body.contains('\n') {
            features |= Self::PARAGRAPH;
        }

        (features, heading_level)
    }
}

/// Multiplier (>= 1.0) for a token or chunk text.
pub fn delay_multiplier(text: &str, settings: &PacingSettings) -> f64 {
    let pauses = &settings.micropauses;
    if !pauses.enabled {
        return 1.0;
    }

    let (features, heading_level) = TokenFeatures::classify(text, pauses.long_word_threshold);
    let rules = [
        (TokenFeatures::CALLOUT, pauses.callout),
        (TokenFeatures::SECTION, pauses.section),
        (TokenFeatures::LIST_ITEM, pauses.list_item),
        (TokenFeatures::SENTENCE_END, pauses.sentence_end),
        (TokenFeatures::CLAUSE_END, pauses.clause_end),
        (TokenFeatures::NUMBER, pauses.number),
        (TokenFeatures::LONG, pauses.long_word),
        (TokenFeatures::PARAGRAPH, pauses.paragraph),
    ];

    let heading = heading_level
        .and_then(|level| HEADING_MULTIPLIERS.get(usize::from(level) - 1))
        .copied()
        .map_or(1.0, factor);

    rules
        .iter()
        .filter(|(flag, _)| features.contains(*flag))
        .fold(heading, |product, (_, multiplier)| product * factor(*multiplier))
}

/// Floor a configured multiplier at 1.0, treating NaN as neutral.
fn factor(multiplier: f64) -> f64 {
    if multiplier.is_nan() {
        1.0
    } else {
        multiplier.max(1.0)
    }
}

/// Base per-token interval in milliseconds at `wpm`.
pub fn base_interval_ms(wpm: f64) -> f64 {
    let wpm = if wpm.is_finite() { wpm.max(MIN_WPM) } else { MIN_WPM };
    60_000.0 / wpm
}

/// Text the delay rules see for a chunk: token texts joined by spaces.
pub fn chunk_text(tokens: &[Token]) -> String {
    let mut text = String::new();
    for (i, token) in tokens.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(&token.text);
    }
    text
}

/// Full delay in milliseconds for a chunk at the given ramp state.
pub fn chunk_delay_ms(tokens: &[Token], settings: &PacingSettings, ramp: &RampState) -> f64 {
    let wpm = ramp.effective_wpm(settings);
    base_interval_ms(wpm)
        * delay_multiplier(&chunk_text(tokens), settings)
        * ramp.slow_start_multiplier(settings)
}
