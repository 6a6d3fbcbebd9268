//! Shared test utilities for block-splice crates.
//!
//! [`TestWorkspace`] wraps a temporary directory with helpers for writing
//! target files and asserting on their contents afterwards.

pub mod workspace;

pub use workspace::TestWorkspace;

/// Marker used by the synthetic fixtures
pub const START: &str = "<<START>>";
/// Delimiter used by the synthetic fixtures
pub const END: &str = "<<END>>";
