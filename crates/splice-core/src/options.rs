//! Options controlling how a replacement is written

use serde::{Deserialize, Serialize};
use splice_fs::{NormalizedPath, RobustnessConfig};

/// How the spliced document reaches the disk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WriteMode {
    /// Temp file plus rename under an advisory lock
    #[default]
    Atomic,
    /// Truncate the target and write into it directly, under the same lock
    InPlace,
}

/// Options for [`crate::Replacer`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaceOptions {
    pub write_mode: WriteMode,
    /// Store the pre-splice content before writing
    pub backup: bool,
    /// Where backups go; defaults to `.splice-backups` beside the target
    pub backup_dir: Option<NormalizedPath>,
    /// Compute the outcome without writing anything
    pub dry_run: bool,
    pub robustness: RobustnessConfig,
}

impl ReplaceOptions {
    pub fn with_write_mode(mut self, write_mode: WriteMode) -> Self {
        self.write_mode = write_mode;
        self
    }

    pub fn with_backup(mut self, backup: bool) -> Self {
        self.backup = backup;
        self
    }

    pub fn with_backup_dir(mut self, dir: impl Into<NormalizedPath>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_robustness(mut self, robustness: RobustnessConfig) -> Self {
        self.robustness = robustness;
        self
    }
}
