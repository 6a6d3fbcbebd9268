//! Block pattern: the marker/delimiter pair that bounds a span

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// The literal strings that bound a replaceable block.
///
/// The span starts at the first occurrence of `start_marker` and ends after
/// the first `end_delimiter` found from that position onwards. Both strings
/// are matched literally; no syntax of the surrounding document is assumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockPattern {
    pub start_marker: String,
    pub end_delimiter: String,
}

impl BlockPattern {
    /// Build a pattern, rejecting empty markers or delimiters.
    pub fn new(start_marker: impl Into<String>, end_delimiter: impl Into<String>) -> Result<Self> {
        let pattern = Self {
            start_marker: start_marker.into(),
            end_delimiter: end_delimiter.into(),
        };
        pattern.validate()?;
        Ok(pattern)
    }

    /// Check the pattern is usable.
    ///
    /// Patterns can arrive through deserialization, so this is also run
    /// before every search.
    pub fn validate(&self) -> Result<()> {
        if self.start_marker.is_empty() {
            return Err(Error::invalid_pattern("start marker is empty"));
        }
        if self.end_delimiter.is_empty() {
            return Err(Error::invalid_pattern("end delimiter is empty"));
        }
        Ok(())
    }
}
