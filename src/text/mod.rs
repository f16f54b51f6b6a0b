//! Text: raw input to annotated token stream.
//!
//! - [`markdown`]: single-pass Markdown normalizer producing the marker convention
//! - [`segmenter`]: whitespace segmentation into [`Token`]s
//! - [`markers`]: the `[Hn]` / `[CALLOUT:kind]` prefix grammar

pub mod markdown;
pub mod markers;
pub mod segmenter;
mod token;

pub use markers::{strip_marker, Marker};
pub use segmenter::{segment, segment_markdown};
pub use token::Token;
