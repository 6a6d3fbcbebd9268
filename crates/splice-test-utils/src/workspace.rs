//! [`TestWorkspace`] builder for splice test scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory with helpers for test setup and assertion.
///
/// # Example
///
/// ```rust,no_run
/// use splice_test_utils::TestWorkspace;
///
/// let ws = TestWorkspace::new();
/// let target = ws.write_file("app/Controller.php", "<?php return [];");
/// ws.assert_file_eq("app/Controller.php", "<?php return [];");
/// # let _ = target;
/// ```
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl TestWorkspace {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path for a workspace-relative path.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write a file (creating parents) and return its absolute path.
    pub fn write_file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Read a file's content.
    pub fn read_file(&self, rel: &str) -> String {
        fs::read_to_string(self.path(rel))
            .unwrap_or_else(|e| panic!("TestWorkspace::read_file({rel}): {e}"))
    }

    /// Names of the entries directly under `rel`, sorted.
    pub fn list_dir(&self, rel: &str) -> Vec<String> {
        let mut names: Vec<String> = match fs::read_dir(self.path(rel)) {
            Ok(entries) => entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect(),
            Err(_) => Vec::new(),
        };
        names.sort();
        names
    }

    /// Assert a file's content is exactly `expected`.
    pub fn assert_file_eq(&self, rel: &str, expected: &str) {
        let actual = self.read_file(rel);
        assert_eq!(actual, expected, "unexpected content in {rel}");
    }

    /// Assert a file exists.
    pub fn assert_file_exists(&self, rel: &str) {
        assert!(self.path(rel).is_file(), "expected file {rel} to exist");
    }
}
