//! Text Segmenter: splits normalized text into an ordered token list.
//!
//! Whitespace runs collapse to single separators. Two kinds of line break
//! survive as a trailing `\n` on the last token of a line, because the
//! delay model pauses on them:
//!
//! - the line is a heading or callout line
//! - the line is followed by a blank line (end of paragraph)
//!
//! The final token of a document never carries a break.

use super::markdown;
use super::markers::Marker;
use super::token::Token;

/// Segment marker-normalized text into tokens.
///
/// Never fails; all-whitespace input yields an empty list.
pub fn segment(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = Vec::new();
    let mut lines = text.lines().peekable();

    while let Some(line) = lines.next() {
        let start = tokens.len();
        for word in line.split_whitespace() {
            tokens.push(Token::new(word, tokens.len()));
        }
        if tokens.len() == start {
            continue;
        }

        let block_line = Marker::parse(&tokens[start].text).is_some();
        let paragraph_end = lines.peek().is_some_and(|next| next.trim().is_empty());
        if block_line || paragraph_end {
            if let Some(last) = tokens.last_mut() {
                last.text.push('\n');
            }
        }
    }

    if let Some(last) = tokens.last_mut() {
        let trimmed = last.text.trim_end_matches('\n').len();
        last.text.truncate(trimmed);
    }

    tokens
}

/// Normalize Markdown and segment the result.
pub fn segment_markdown(source: &str) -> Vec<Token> {
    segment(&markdown::normalize(source))
}
