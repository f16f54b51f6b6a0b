//! Token: one whitespace-delimited unit of the segmented stream.

use super::markers::strip_marker;

/// A single token at a fixed position in a loaded document.
///
/// The text keeps any structural prefix (`[H2]`, `[CALLOUT:note]`) and a
/// trailing `\n` when the token closes a paragraph or a heading line.
/// Renderers should show [`Token::display_text`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Raw token text, markers included.
    pub text: String,
    /// Position in the token sequence.
    pub index: usize,
}

impl Token {
    /// Create a new token.
    pub fn new(text: impl Into<String>, index: usize) -> Self {
        Self {
            text: text.into(),
            index,
        }
    }

    /// Text with marker prefix and trailing break removed.
    pub fn display_text(&self) -> &str {
        strip_marker(self.text.trim_end_matches('\n'))
    }

    /// Whether this token ends a paragraph or block line.
    pub fn is_paragraph_end(&self) -> bool {
        self.text.ends_with('\n')
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_text())
    }
}
