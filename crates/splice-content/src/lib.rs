//! Text layer for block-splice
//!
//! Locates a marker-anchored span inside a document, splices a replacement
//! payload over it, and describes the resulting change as a diff. Nothing in
//! this crate touches the filesystem.

pub mod diff;
pub mod error;
pub mod pattern;
pub mod splice;

pub use diff::SpliceDiff;
pub use error::{Error, Result};
pub use pattern::BlockPattern;
pub use splice::{LineRange, Spliced, line_range, locate_span, splice};
