//! Landmark: a recorded heading or callout occurrence.

/// Whether a landmark came from a heading or a callout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LandmarkKind {
    /// Heading of depth 1-6.
    Heading,
    /// Callout-style annotation.
    Callout,
}

/// A structural landmark referencing a token position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landmark {
    /// Nesting level: 0 for callouts, 1-6 for heading depth.
    pub level: u8,
    /// Human-readable label.
    pub label: String,
    /// Index of the token carrying the marker.
    pub token_index: usize,
    /// Callout identifier (`note`, `warning`, ...), callouts only.
    pub callout_kind: Option<String>,
}

impl Landmark {
    /// Create a heading landmark.
    pub fn heading(level: u8, label: impl Into<String>, token_index: usize) -> Self {
        Self {
            level,
            label: label.into(),
            token_index,
            callout_kind: None,
        }
    }

    /// Create a callout landmark.
    pub fn callout(kind: impl Into<String>, label: impl Into<String>, token_index: usize) -> Self {
        Self {
            level: 0,
            label: label.into(),
            token_index,
            callout_kind: Some(kind.into()),
        }
    }

    /// Kind of this landmark.
    pub const fn kind(&self) -> LandmarkKind {
        if self.callout_kind.is_some() {
            LandmarkKind::Callout
        } else {
            LandmarkKind::Heading
        }
    }
}
