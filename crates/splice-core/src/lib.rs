//! Block replacement for block-splice
//!
//! Ties the text layer and the filesystem layer together: [`replace_block`]
//! and [`Replacer`] read a file, splice a payload over a marker-bounded
//! span, and write the result back, optionally with a backup. Recipes
//! describe a replacement as a data file.

pub mod backup;
pub mod error;
pub mod options;
pub mod recipe;
pub mod replacer;

pub use backup::{BackupMetadata, BackupRecord, BackupStore, DEFAULT_BACKUP_DIR};
pub use error::{Error, Result};
pub use options::{ReplaceOptions, WriteMode};
pub use recipe::{Recipe, load_request};
pub use replacer::{PreparedSplice, ReplaceOutcome, ReplaceRequest, Replacer, SpanReport, replace_block};

pub use splice_content::{BlockPattern, LineRange, SpliceDiff};
pub use splice_fs::{NormalizedPath, RobustnessConfig};
