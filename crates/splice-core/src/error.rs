//! Error types for splice-core

use std::path::PathBuf;

/// Result type for splice-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while replacing blocks or managing backups
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Marker, delimiter or pattern problem
    #[error(transparent)]
    Content(#[from] splice_content::Error),

    /// Filesystem or recipe-file problem
    #[error(transparent)]
    Fs(#[from] splice_fs::Error),

    #[error("{path} changed on disk during the splice (read {expected}, now {actual})")]
    ConcurrentModification {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Backup {path} is corrupt: expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Invalid recipe {path}: {message}")]
    InvalidRecipe { path: PathBuf, message: String },

    #[error("No backup found for {path}")]
    BackupNotFound { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_recipe(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidRecipe {
            path: path.into(),
            message: message.into(),
        }
    }

    /// True for errors meaning the file no longer has the expected shape
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            Self::Content(
                splice_content::Error::MarkerNotFound { .. }
                    | splice_content::Error::DelimiterNotFound { .. }
            )
        )
    }
}
