//! Structural marker grammar shared by the segmenter, indexer and delay rules.
//!
//! Two in-band prefixes survive normalization:
//!
//! - `[H1]` .. `[H6]` glued to the first word of a heading
//! - `[CALLOUT:<identifier>]` glued to the first word of a callout title
//!
//! Anything that looks like a marker but cannot be parsed (`[H0]`, `[H7]`,
//! `[CALLOUT:]`) is treated as ordinary text.

use once_cell::sync::Lazy;
use regex::Regex;

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[H([1-6])\]").expect("heading marker pattern"));

static CALLOUT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[CALLOUT:([A-Za-z0-9_-]+)\]").expect("callout marker pattern")
});

/// A parsed structural prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker<'a> {
    /// Heading marker with its depth (1-6).
    Heading(u8),
    /// Callout marker with its identifier.
    Callout(&'a str),
}

impl<'a> Marker<'a> {
    /// Parse the marker at the start of `text`.
    ///
    /// Heading markers take priority; a token is never both.
    pub fn parse(text: &'a str) -> Option<(Self, usize)> {
        if let Some(caps) = HEADING.captures(text) {
            let level = caps[1].parse::<u8>().ok()?;
            return Some((Self::Heading(level), caps[0].len()));
        }
        let caps = CALLOUT.captures(text)?;
        let kind = caps.get(1)?.as_str();
        Some((Self::Callout(kind), caps.get(0)?.end()))
    }

    /// Nesting level used by the breadcrumb resolver (callouts are 0).
    pub const fn level(&self) -> u8 {
        match self {
            Self::Heading(level) => *level,
            Self::Callout(_) => 0,
        }
    }
}

/// Build the heading marker for a given depth.
pub fn heading_marker(level: u8) -> String {
    format!("[H{}]", level.clamp(1, 6))
}

/// Build the callout marker for an identifier.
pub fn callout_marker(kind: &str) -> String {
    format!("[CALLOUT:{kind}]")
}

/// Return `text` without its structural prefix, if any.
pub fn strip_marker(text: &str) -> &str {
    Marker::parse(text).map_or(text, |(_, len)| &text[len..])
}
