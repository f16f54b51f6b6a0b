//! Structure Indexer: one linear scan from tokens to landmarks.

use super::landmark::Landmark;
use crate::text::{Marker, Token};

/// Upper bound on the number of tokens folded into a label.
const MAX_LABEL_TOKENS: usize = 12;

/// Build the ordered landmark list for a token sequence.
///
/// Tokens are tested for a heading marker first, then a callout marker.
/// Malformed markers are not recorded. Runs in O(n).
pub fn index(tokens: &[Token]) -> Vec<Landmark> {
    let mut landmarks = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        let Some((marker, _)) = Marker::parse(&token.text) else {
            continue;
        };
        let label = label_from(&tokens[position..]);
        let landmark = match marker {
            Marker::Heading(level) => Landmark::heading(level, label, token.index),
            Marker::Callout(kind) => {
                let label = if label.is_empty() {
                    kind.to_string()
                } else {
                    label
                };
                Landmark::callout(kind, label, token.index)
            }
        };
        landmarks.push(landmark);
    }

    landmarks
}

/// Join display text from the marker token up to the end of its line.
fn label_from(tokens: &[Token]) -> String {
    let mut words = Vec::new();
    for token in tokens.iter().take(MAX_LABEL_TOKENS) {
        let word = token.display_text();
        if !word.is_empty() {
            words.push(word);
        }
        if token.is_paragraph_end() {
            break;
        }
    }
    words.join(" ")
}
