//! Line diff between a document and its spliced form

use serde::{Deserialize, Serialize};
use similar::{ChangeTag, TextDiff};

/// Number of unchanged lines shown around each hunk
const CONTEXT_LINES: usize = 3;

/// Summary of a splice as a line diff
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpliceDiff {
    /// Unified diff text, empty when nothing changed
    pub unified: String,
    /// Lines present only in the new document
    pub inserted: usize,
    /// Lines present only in the old document
    pub deleted: usize,
    /// Similarity ratio (0.0 to 1.0)
    pub similarity: f32,
}

impl SpliceDiff {
    /// Diff for two identical documents
    pub fn unchanged() -> Self {
        Self {
            unified: String::new(),
            inserted: 0,
            deleted: 0,
            similarity: 1.0,
        }
    }

    /// Compute the line diff between `old` and `new`.
    ///
    /// `label` names the file in the `---`/`+++` headers.
    pub fn compute(old: &str, new: &str, label: &str) -> Self {
        if old == new {
            return Self::unchanged();
        }

        let old_header = format!("a/{label}");
        let new_header = format!("b/{label}");
        let text_diff = TextDiff::from_lines(old, new);

        let mut inserted = 0;
        let mut deleted = 0;
        for change in text_diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => inserted += 1,
                ChangeTag::Delete => deleted += 1,
                ChangeTag::Equal => {}
            }
        }

        let unified = text_diff
            .unified_diff()
            .context_radius(CONTEXT_LINES)
            .header(&old_header, &new_header)
            .to_string();

        Self {
            unified,
            inserted,
            deleted,
            similarity: text_diff.ratio(),
        }
    }

    /// True when the two documents were identical
    pub fn is_empty(&self) -> bool {
        self.inserted == 0 && self.deleted == 0
    }
}

impl Default for SpliceDiff {
    fn default() -> Self {
        Self::unchanged()
    }
}
