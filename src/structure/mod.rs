//! Structure: landmarks and the breadcrumb hierarchy built from them.
//!
//! - [`indexer`]: linear scan producing the ordered [`Landmark`] list
//! - [`breadcrumb`]: stack-based ancestry reconstruction
//! - [`Document`]: the per-load bundle shared with observers

pub mod breadcrumb;
mod document;
pub mod indexer;
mod landmark;

pub use breadcrumb::{resolve, BreadcrumbContext};
pub use document::Document;
pub use landmark::{Landmark, LandmarkKind};
