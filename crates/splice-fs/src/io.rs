//! Whole-file text I/O: atomic writes with locking, and plain in-place writes

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use backoff::ExponentialBackoffBuilder;
use backoff::backoff::Backoff;
use fs2::FileExt;
use tracing::{debug, warn};

use crate::checksum::compute_file_checksum;
use crate::{Error, NormalizedPath, Result};

/// Distinguishes temp files of concurrent writers within one process
static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Tuning for [`write_atomic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobustnessConfig {
    /// How long to keep retrying the advisory lock before giving up
    pub lock_timeout: Duration,
    /// Whether to fsync the temp file before renaming it over the target
    pub enable_fsync: bool,
}

impl Default for RobustnessConfig {
    fn default() -> Self {
        Self {
            lock_timeout: Duration::from_secs(5),
            enable_fsync: true,
        }
    }
}

/// Read text content from a file.
pub fn read_text(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    fs::read_to_string(&native_path).map_err(|e| Error::io(&native_path, e))
}

/// Write content atomically to a file with locking.
///
/// The content goes to a temp file in the same directory which is then
/// renamed over the target, so readers see either the old or the new file,
/// never a truncated one. An exclusive advisory lock on a `<file>.lock`
/// sidecar serializes concurrent writers; it is retried with exponential
/// backoff until `config.lock_timeout` elapses.
///
/// A symlinked target is written through: the file it points to receives
/// the content and the link stays a link. A target with other hard links is
/// overwritten in place (still under the lock) so every link sees the new
/// content.
///
/// An existing target keeps its permissions. A read-only target is refused
/// with `PermissionDenied`, matching what a direct write would do.
pub fn write_atomic(path: &NormalizedPath, content: &[u8], config: RobustnessConfig) -> Result<()> {
    write_locked(path, content, None, Strategy::Replace, config)
}

/// [`write_atomic`], but only if the file still has checksum `expected`.
///
/// The checksum is taken while the write lock is held, so two writers that
/// read the same content cannot both succeed. A mismatch fails with
/// [`Error::ContentChanged`] and leaves the file alone.
pub fn write_atomic_if(
    path: &NormalizedPath,
    content: &[u8],
    expected: &str,
    config: RobustnessConfig,
) -> Result<()> {
    write_locked(path, content, Some(expected), Strategy::Replace, config)
}

/// Overwrite a file in place: truncate, then write.
///
/// No temp file and no lock. A reader racing the write can observe a
/// partially written file.
pub fn write_in_place(path: &NormalizedPath, content: &[u8]) -> Result<()> {
    let native_path = path.to_native();
    fs::write(&native_path, content).map_err(|e| Error::io(&native_path, e))
}

/// [`write_in_place`] under the write lock, only if the file still has
/// checksum `expected`.
pub fn write_in_place_if(
    path: &NormalizedPath,
    content: &[u8],
    expected: &str,
    config: RobustnessConfig,
) -> Result<()> {
    write_locked(path, content, Some(expected), Strategy::InPlace, config)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Replace,
    InPlace,
}

fn write_locked(
    path: &NormalizedPath,
    content: &[u8],
    expected: Option<&str>,
    strategy: Strategy,
    config: RobustnessConfig,
) -> Result<()> {
    let target = resolve_target(path)?;
    let native_path = target.to_native();

    if let Some(parent) = native_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let (existing_permissions, strategy) = match fs::metadata(&native_path) {
        Ok(meta) if meta.permissions().readonly() => {
            return Err(Error::io(
                &native_path,
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "target file is read-only"),
            ));
        }
        Ok(meta) if strategy == Strategy::Replace && is_multiply_linked(&meta) => {
            debug!(path = %target, "target has other hard links, writing in place");
            (Some(meta.permissions()), Strategy::InPlace)
        }
        Ok(meta) => (Some(meta.permissions()), strategy),
        Err(_) => (None, strategy),
    };

    let lock_path = target.with_suffix("lock").to_native();
    let lock_file = lock_sidecar(&lock_path, &native_path, config.lock_timeout)?;

    let result = verify_checksum(&target, expected).and_then(|()| match strategy {
        Strategy::Replace => {
            write_via_temp(&native_path, content, existing_permissions, config.enable_fsync)
        }
        Strategy::InPlace => fs::write(&native_path, content).map_err(|e| Error::io(&native_path, e)),
    });

    // Unlinked while still held: a waiter that locks the old inode sees it
    // is no longer the sidecar and reopens.
    if let Err(e) = fs::remove_file(&lock_path) {
        debug!(path = %lock_path.display(), error = %e, "failed to remove lock sidecar");
    }
    if let Err(e) = FileExt::unlock(&lock_file) {
        warn!(path = %lock_path.display(), error = %e, "failed to release write lock");
    }

    result
}

/// Follow a symlinked target to the file it names.
fn resolve_target(path: &NormalizedPath) -> Result<NormalizedPath> {
    match fs::symlink_metadata(path.to_native()) {
        Ok(meta) if meta.file_type().is_symlink() => {
            let resolved = path.canonicalize()?;
            debug!(link = %path, target = %resolved, "writing through symlink");
            Ok(resolved)
        }
        _ => Ok(path.clone()),
    }
}

#[cfg(unix)]
fn is_multiply_linked(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    meta.nlink() > 1
}

#[cfg(not(unix))]
fn is_multiply_linked(_meta: &fs::Metadata) -> bool {
    false
}

fn verify_checksum(target: &NormalizedPath, expected: Option<&str>) -> Result<()> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let actual = compute_file_checksum(target)?;
    if actual != expected {
        warn!(path = %target, "file changed since it was read");
        return Err(Error::ContentChanged {
            path: target.to_native(),
            expected: expected.to_owned(),
            actual,
        });
    }
    Ok(())
}

/// Open and exclusively lock the sidecar at `lock_path`.
///
/// Retries with backoff while another writer holds it, and reopens when the
/// locked file was unlinked by the previous holder.
fn lock_sidecar(lock_path: &Path, target: &Path, timeout: Duration) -> Result<File> {
    let mut policy = ExponentialBackoffBuilder::new()
        .with_initial_interval(Duration::from_millis(10))
        .with_max_interval(Duration::from_millis(250))
        .with_max_elapsed_time(Some(timeout))
        .build();

    loop {
        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path)
            .map_err(|e| Error::io(lock_path, e))?;

        let busy = match FileExt::try_lock_exclusive(&lock_file) {
            Ok(()) if is_current_sidecar(&lock_file, lock_path) => return Ok(lock_file),
            Ok(()) => {
                let _ = FileExt::unlock(&lock_file);
                "sidecar was replaced".to_owned()
            }
            Err(e) => e.to_string(),
        };

        match policy.next_backoff() {
            Some(wait) => {
                debug!(path = %target.display(), reason = %busy, ?wait, "write lock busy, retrying");
                std::thread::sleep(wait);
            }
            None => {
                return Err(Error::LockFailed {
                    path: target.to_path_buf(),
                });
            }
        }
    }
}

#[cfg(unix)]
fn is_current_sidecar(file: &File, lock_path: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (file.metadata(), fs::metadata(lock_path)) {
        (Ok(held), Ok(on_disk)) => held.dev() == on_disk.dev() && held.ino() == on_disk.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_current_sidecar(_file: &File, lock_path: &Path) -> bool {
    lock_path.exists()
}

fn write_via_temp(
    target: &Path,
    content: &[u8],
    permissions: Option<fs::Permissions>,
    fsync: bool,
) -> Result<()> {
    // Same directory keeps the rename on one filesystem.
    let temp_name = format!(
        ".{}.{}.{}.tmp",
        target
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id(),
        TEMP_COUNTER.fetch_add(1, Ordering::Relaxed)
    );
    let temp_path = target.with_file_name(&temp_name);

    let written = write_then_rename(&temp_path, target, content, permissions, fsync);
    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_then_rename(
    temp_path: &Path,
    target: &Path,
    content: &[u8],
    permissions: Option<fs::Permissions>,
    fsync: bool,
) -> Result<()> {
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(temp_path)
        .map_err(|e| Error::io(temp_path, e))?;

    temp_file
        .write_all(content)
        .map_err(|e| Error::io(temp_path, e))?;

    if fsync {
        temp_file.sync_all().map_err(|e| Error::io(temp_path, e))?;
    }
    drop(temp_file);

    if let Some(permissions) = permissions {
        fs::set_permissions(temp_path, permissions).map_err(|e| Error::io(temp_path, e))?;
    }

    fs::rename(temp_path, target).map_err(|e| Error::io(target, e))
}
