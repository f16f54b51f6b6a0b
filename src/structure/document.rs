//! Document: the immutable token and landmark arrays for one load.

use super::breadcrumb::{self, BreadcrumbContext};
use super::indexer;
use super::landmark::Landmark;
use crate::text::{self, Token};
use std::sync::Arc;

/// Tokens and landmarks produced by a single `load()`.
///
/// Both arrays are reference counted so observers (renderer, navigation UI)
/// can hold them while the engine keeps playing.
#[derive(Debug, Clone)]
pub struct Document {
    tokens: Arc<[Token]>,
    landmarks: Arc<[Landmark]>,
}

impl Default for Document {
    fn default() -> Self {
        Self::from_tokens(Vec::new())
    }
}

impl Document {
    /// Segment and index marker-normalized text.
    pub fn from_text(text: &str) -> Self {
        Self::from_tokens(text::segment(text))
    }

    /// Normalize Markdown, then segment and index it.
    pub fn from_markdown(source: &str) -> Self {
        Self::from_tokens(text::segment_markdown(source))
    }

    /// Index an already segmented token list.
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        let landmarks = indexer::index(&tokens);
        Self {
            tokens: tokens.into(),
            landmarks: landmarks.into(),
        }
    }

    /// All tokens.
    pub fn tokens(&self) -> &Arc<[Token]> {
        &self.tokens
    }

    /// All landmarks, ordered by token index.
    pub fn landmarks(&self) -> &Arc<[Landmark]> {
        &self.landmarks
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the document has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Breadcrumb for a token position.
    pub fn breadcrumb(&self, index: usize) -> BreadcrumbContext {
        breadcrumb::resolve(&self.landmarks, index)
    }

    /// First landmark strictly after `index`.
    pub fn next_landmark(&self, index: usize) -> Option<&Landmark> {
        let at = self.landmarks.partition_point(|l| l.token_index <= index);
        self.landmarks.get(at)
    }

    /// Last landmark strictly before `index`.
    pub fn previous_landmark(&self, index: usize) -> Option<&Landmark> {
        let at = self.landmarks.partition_point(|l| l.token_index < index);
        at.checked_sub(1).and_then(|i| self.landmarks.get(i))
    }
}
