//! Pre-splice backups
//!
//! Each backup is two files in the backup directory:
//! - `<file>.<timestamp>.bak`: the original content, byte for byte
//! - `<file>.<timestamp>.bak.toml`: metadata (original path, time, checksum)

use std::fs;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use splice_fs::checksum::compute_content_checksum;
use splice_fs::{ConfigStore, NormalizedPath, RobustnessConfig, io};
use tracing::{debug, info, warn};

use crate::{Error, Result};

/// Directory name used when no backup directory is configured
pub const DEFAULT_BACKUP_DIR: &str = ".splice-backups";

const METADATA_SUFFIX: &str = "toml";

/// Metadata stored next to each backup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMetadata {
    /// Canonical path of the file that was backed up
    pub original: String,
    pub created: DateTime<Utc>,
    /// Checksum of the backed-up content
    pub checksum: String,
}

/// A backup on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackupRecord {
    /// Path of the `.bak` content file
    pub path: String,
    pub metadata: BackupMetadata,
}

impl BackupRecord {
    pub fn backup_path(&self) -> NormalizedPath {
        NormalizedPath::new(&self.path)
    }

    pub fn original_path(&self) -> NormalizedPath {
        NormalizedPath::new(&self.metadata.original)
    }
}

/// Creates, lists and restores backups in one directory
#[derive(Debug)]
pub struct BackupStore {
    dir: NormalizedPath,
    robustness: RobustnessConfig,
    config: ConfigStore,
}

impl BackupStore {
    pub fn new(dir: impl Into<NormalizedPath>) -> Self {
        Self::with_robustness(dir, RobustnessConfig::default())
    }

    pub fn with_robustness(dir: impl Into<NormalizedPath>, robustness: RobustnessConfig) -> Self {
        Self {
            dir: dir.into(),
            robustness,
            config: ConfigStore::with_robustness(robustness),
        }
    }

    /// The default store for `target`: `.splice-backups` in its directory.
    pub fn for_target(target: &NormalizedPath) -> Self {
        let parent = target.parent().unwrap_or_else(|| NormalizedPath::new("."));
        Self::new(parent.join(DEFAULT_BACKUP_DIR))
    }

    pub fn dir(&self) -> &NormalizedPath {
        &self.dir
    }

    /// Store `content` as a backup of `target`.
    pub fn create(&self, target: &NormalizedPath, content: &str) -> Result<BackupRecord> {
        let original = identity(target);
        let file_name = original.file_name().unwrap_or("file").to_string();
        let created = Utc::now();
        let stamp = created.format("%Y%m%dT%H%M%S%3fZ").to_string();

        let backup_path = self.reserve(&file_name, &stamp)?;
        io::write_atomic(&backup_path, content.as_bytes(), self.robustness)?;

        let metadata = BackupMetadata {
            original: original.to_string(),
            created,
            checksum: compute_content_checksum(content),
        };
        self.config
            .save(&backup_path.with_suffix(METADATA_SUFFIX), &metadata)?;

        info!(original = %original, backup = %backup_path, "created backup");
        Ok(BackupRecord {
            path: backup_path.to_string(),
            metadata,
        })
    }

    /// Claim an unused `<file>.<stamp>[-n].bak` name by creating it empty.
    fn reserve(&self, file_name: &str, stamp: &str) -> Result<NormalizedPath> {
        let native_dir = self.dir.to_native();
        fs::create_dir_all(&native_dir).map_err(|e| Error::io(&native_dir, e))?;

        let mut attempt = 0;
        loop {
            let name = match attempt {
                0 => format!("{file_name}.{stamp}.bak"),
                n => format!("{file_name}.{stamp}-{n}.bak"),
            };
            let candidate = self.dir.join(&name);
            let native = candidate.to_native();
            match fs::OpenOptions::new().write(true).create_new(true).open(&native) {
                Ok(_) if !candidate.with_suffix(METADATA_SUFFIX).exists() => return Ok(candidate),
                Ok(_) => {
                    // Orphaned metadata owns this name.
                    let _ = fs::remove_file(&native);
                }
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
                Err(e) => return Err(Error::io(native, e)),
            }
            attempt += 1;
        }
    }

    /// All backups of `target`, oldest first.
    pub fn list(&self, target: &NormalizedPath) -> Result<Vec<BackupRecord>> {
        let original = identity(target).to_string();
        let native_dir = self.dir.to_native();

        let entries = match fs::read_dir(&native_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(Error::io(native_dir, e)),
        };

        let mut records = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::io(&native_dir, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(backup_name) = name.strip_suffix(".toml") else {
                continue;
            };
            if !backup_name.ends_with(".bak") {
                continue;
            }

            let metadata: BackupMetadata = match self.config.load(&self.dir.join(&name)) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(file = %name, error = %e, "skipping unreadable backup metadata");
                    continue;
                }
            };
            if metadata.original != original {
                continue;
            }
            records.push(BackupRecord {
                path: self.dir.join(backup_name).to_string(),
                metadata,
            });
        }

        records.sort_by(|a, b| {
            a.metadata
                .created
                .cmp(&b.metadata.created)
                .then_with(|| a.path.cmp(&b.path))
        });
        debug!(original = %original, count = records.len(), "listed backups");
        Ok(records)
    }

    /// Delete a backup and its metadata.
    pub fn discard(&self, record: &BackupRecord) -> Result<()> {
        let backup_path = record.backup_path();
        for path in [backup_path.with_suffix(METADATA_SUFFIX), backup_path.clone()] {
            let native = path.to_native();
            match fs::remove_file(&native) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(Error::io(native, e)),
            }
        }
        debug!(backup = %backup_path, "discarded backup");
        Ok(())
    }

    /// The most recent backup of `target`, if any.
    pub fn latest(&self, target: &NormalizedPath) -> Result<Option<BackupRecord>> {
        Ok(self.list(target)?.pop())
    }

    /// Write a backup's content back over its original file.
    ///
    /// The content is checked against the stored checksum first.
    pub fn restore(&self, record: &BackupRecord) -> Result<()> {
        let backup_path = record.backup_path();
        let content = io::read_text(&backup_path)?;

        let actual = compute_content_checksum(&content);
        if actual != record.metadata.checksum {
            return Err(Error::ChecksumMismatch {
                path: backup_path.to_native(),
                expected: record.metadata.checksum.clone(),
                actual,
            });
        }

        let original = record.original_path();
        io::write_atomic(&original, content.as_bytes(), self.robustness)?;
        info!(original = %original, backup = %backup_path, "restored backup");
        Ok(())
    }
}

/// Stable identity of a target, even if it has since been deleted.
fn identity(target: &NormalizedPath) -> NormalizedPath {
    if let Ok(canonical) = target.canonicalize() {
        return canonical;
    }
    match (target.parent(), target.file_name()) {
        (Some(parent), Some(name)) => parent
            .canonicalize()
            .map(|dir| dir.join(name))
            .unwrap_or_else(|_| target.clone()),
        _ => target.clone(),
    }
}
