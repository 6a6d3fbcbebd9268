//! Span location and splicing

use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{BlockPattern, Error, Result};

/// The outcome of splicing a payload over a located span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spliced {
    /// Full document after the replacement
    pub content: String,
    /// Byte range of the replaced span in the original document
    pub span: Range<usize>,
    /// Text that occupied the span, marker and delimiter included
    pub removed: String,
    /// Byte range of the inserted payload in the new document
    pub inserted: Range<usize>,
}

impl Spliced {
    /// True when the payload was identical to the text it replaced
    pub fn is_noop(&self) -> bool {
        self.content[self.inserted.clone()] == self.removed
    }
}

/// 1-based, inclusive line numbers covered by a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    pub first: usize,
    pub last: usize,
}

/// Locate the span bounded by `pattern` in `content`.
///
/// The span begins at the first occurrence of the start marker. The
/// delimiter search starts at the marker's own position, so a delimiter
/// embedded in the marker text terminates the span.
pub fn locate_span(content: &str, pattern: &BlockPattern) -> Result<Range<usize>> {
    pattern.validate()?;

    let start = content
        .find(&pattern.start_marker)
        .ok_or_else(|| Error::MarkerNotFound {
            marker: pattern.start_marker.clone(),
        })?;

    let offset = content[start..]
        .find(&pattern.end_delimiter)
        .ok_or_else(|| Error::DelimiterNotFound {
            delimiter: pattern.end_delimiter.clone(),
            from: start,
        })?;

    let end = start + offset + pattern.end_delimiter.len();
    debug!(start, end, "located block span");
    Ok(start..end)
}

/// Replace the span bounded by `pattern` with `replacement`.
///
/// Everything before the marker and after the delimiter is carried over
/// byte for byte. The replacement is inserted verbatim.
pub fn splice(content: &str, pattern: &BlockPattern, replacement: &str) -> Result<Spliced> {
    let span = locate_span(content, pattern)?;

    let mut spliced = String::with_capacity(content.len() - span.len() + replacement.len());
    spliced.push_str(&content[..span.start]);
    spliced.push_str(replacement);
    spliced.push_str(&content[span.end..]);

    Ok(Spliced {
        content: spliced,
        removed: content[span.clone()].to_string(),
        inserted: span.start..span.start + replacement.len(),
        span,
    })
}

/// Line numbers touched by `span` within `content`.
pub fn line_range(content: &str, span: &Range<usize>) -> LineRange {
    let first = content[..span.start].matches('\n').count() + 1;
    let last = first + content[span.clone()].matches('\n').count();
    LineRange { first, last }
}
