//! The Block Replacer: read, locate, splice, write

use std::ops::Range;

use serde::Serialize;
use splice_content::{BlockPattern, LineRange, SpliceDiff, line_range, locate_span, splice};
use splice_fs::checksum::{compute_content_checksum, compute_file_checksum};
use splice_fs::{NormalizedPath, io};
use tracing::{debug, info, warn};

use crate::backup::{BackupRecord, BackupStore};
use crate::options::{ReplaceOptions, WriteMode};
use crate::{Error, Result};

/// One replacement to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceRequest {
    pub path: NormalizedPath,
    pub pattern: BlockPattern,
    /// Opaque payload, inserted verbatim
    pub replacement: String,
}

impl ReplaceRequest {
    pub fn new(
        path: impl Into<NormalizedPath>,
        pattern: BlockPattern,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            pattern,
            replacement: replacement.into(),
        }
    }
}

/// Where a pattern matches, without changing anything
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpanReport {
    pub path: String,
    pub span: Range<usize>,
    pub lines: LineRange,
    pub removed_bytes: usize,
}

/// What a replacement did (or would do, on a dry run)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaceOutcome {
    pub path: String,
    pub span: Range<usize>,
    pub lines: LineRange,
    pub removed_bytes: usize,
    pub inserted_bytes: usize,
    pub diff: SpliceDiff,
    pub dry_run: bool,
    pub written: bool,
    pub backup: Option<BackupRecord>,
}

impl ReplaceOutcome {
    /// One-line description for humans
    pub fn summary(&self) -> String {
        let verb = if self.written { "replaced" } else { "would replace" };
        format!(
            "{verb} lines {}-{} of {} ({} bytes -> {} bytes, +{} -{} lines)",
            self.lines.first,
            self.lines.last,
            self.path,
            self.removed_bytes,
            self.inserted_bytes,
            self.diff.inserted,
            self.diff.deleted,
        )
    }
}

/// A splice computed in memory and not yet written
#[derive(Debug, Clone)]
pub struct PreparedSplice {
    path: NormalizedPath,
    original: String,
    original_checksum: String,
    content: String,
    outcome: ReplaceOutcome,
}

impl PreparedSplice {
    /// The document as it would be written
    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn outcome(&self) -> &ReplaceOutcome {
        &self.outcome
    }
}

/// Performs bounded find-and-replace passes over text files
#[derive(Debug, Clone, Default)]
pub struct Replacer {
    options: ReplaceOptions,
}

impl Replacer {
    pub fn new(options: ReplaceOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReplaceOptions {
        &self.options
    }

    /// Locate the span `pattern` would replace in `path`.
    pub fn check(&self, path: &NormalizedPath, pattern: &BlockPattern) -> Result<SpanReport> {
        let content = io::read_text(path)?;
        let span = locate_span(&content, pattern)?;
        Ok(SpanReport {
            path: path.to_string(),
            lines: line_range(&content, &span),
            removed_bytes: span.len(),
            span,
        })
    }

    /// Read the target and compute the spliced document.
    pub fn prepare(&self, request: &ReplaceRequest) -> Result<PreparedSplice> {
        let original = io::read_text(&request.path)?;
        let spliced = splice(&original, &request.pattern, &request.replacement)?;
        debug!(
            path = %request.path,
            start = spliced.span.start,
            end = spliced.span.end,
            noop = spliced.is_noop(),
            "prepared splice"
        );

        let outcome = ReplaceOutcome {
            path: request.path.to_string(),
            lines: line_range(&original, &spliced.span),
            removed_bytes: spliced.removed.len(),
            inserted_bytes: spliced.inserted.len(),
            diff: SpliceDiff::compute(&original, &spliced.content, request.path.as_str()),
            dry_run: self.options.dry_run,
            written: false,
            backup: None,
            span: spliced.span,
        };

        Ok(PreparedSplice {
            path: request.path.clone(),
            original_checksum: compute_content_checksum(&original),
            original,
            content: spliced.content,
            outcome,
        })
    }

    /// Write a prepared splice to disk.
    ///
    /// Fails with `ConcurrentModification` if the file no longer matches
    /// what `prepare` read. Nothing is written on a dry run.
    pub fn commit(&self, prepared: PreparedSplice) -> Result<ReplaceOutcome> {
        let PreparedSplice {
            path,
            original,
            original_checksum,
            content,
            mut outcome,
        } = prepared;

        if self.options.dry_run {
            info!(path = %path, "dry run, leaving file untouched");
            return Ok(outcome);
        }

        // Checked before the backup is taken and again under the write lock.
        let current = compute_file_checksum(&path)?;
        if current != original_checksum {
            warn!(path = %path, "file changed since it was read");
            return Err(Error::ConcurrentModification {
                path: path.to_native(),
                expected: original_checksum,
                actual: current,
            });
        }

        let store = self.backup_store(&path);
        if self.options.backup {
            outcome.backup = Some(store.create(&path, &original)?);
        }

        let robustness = self.options.robustness;
        let written = match self.options.write_mode {
            WriteMode::Atomic => {
                io::write_atomic_if(&path, content.as_bytes(), &original_checksum, robustness)
            }
            WriteMode::InPlace => {
                io::write_in_place_if(&path, content.as_bytes(), &original_checksum, robustness)
            }
        };
        if let Err(e) = written {
            if let Some(record) = outcome.backup.take() {
                if let Err(discard) = store.discard(&record) {
                    warn!(backup = %record.path, error = %discard, "failed to discard backup");
                }
            }
            return Err(match e {
                splice_fs::Error::ContentChanged {
                    path,
                    expected,
                    actual,
                } => Error::ConcurrentModification {
                    path,
                    expected,
                    actual,
                },
                other => other.into(),
            });
        }
        outcome.written = true;

        info!(
            path = %path,
            first_line = outcome.lines.first,
            last_line = outcome.lines.last,
            mode = ?self.options.write_mode,
            "replaced block"
        );
        Ok(outcome)
    }

    /// Prepare and commit in one step.
    pub fn replace(&self, request: &ReplaceRequest) -> Result<ReplaceOutcome> {
        let prepared = self.prepare(request)?;
        self.commit(prepared)
    }

    /// Restore the most recent backup of `path`.
    pub fn restore_latest(&self, path: &NormalizedPath) -> Result<BackupRecord> {
        let store = self.backup_store(path);
        let record = store.latest(path)?.ok_or_else(|| Error::BackupNotFound {
            path: path.to_native(),
        })?;
        store.restore(&record)?;
        Ok(record)
    }

    fn backup_store(&self, path: &NormalizedPath) -> BackupStore {
        match &self.options.backup_dir {
            Some(dir) => BackupStore::with_robustness(dir.clone(), self.options.robustness),
            None => {
                let default = BackupStore::for_target(path);
                BackupStore::with_robustness(default.dir().clone(), self.options.robustness)
            }
        }
    }
}

/// Replace the span from `start_marker` to the first `end_delimiter` after it
/// in `file_path` with `replacement_text`, using default options.
pub fn replace_block(
    file_path: impl Into<NormalizedPath>,
    start_marker: &str,
    end_delimiter: &str,
    replacement_text: &str,
) -> Result<ReplaceOutcome> {
    let pattern = BlockPattern::new(start_marker, end_delimiter)?;
    Replacer::default().replace(&ReplaceRequest::new(file_path, pattern, replacement_text))
}
