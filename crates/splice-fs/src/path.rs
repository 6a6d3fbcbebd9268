//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// A path normalized to use forward slashes internally.
///
/// Paths are kept with forward slashes so that diff headers, log lines and
/// backup metadata read the same on every platform, and are converted to
/// platform-native form only at I/O boundaries. Backslashes are separators
/// only on Windows; elsewhere they are ordinary file name bytes and kept.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            inner: to_forward_slashes(&path.as_ref().to_string_lossy()),
        }
    }

    /// Resolve symlinks and relative components against the filesystem.
    ///
    /// Uses `dunce` so Windows paths do not come back in `\\?\` form.
    pub fn canonicalize(&self) -> Result<Self> {
        let native = self.to_native();
        dunce::canonicalize(&native)
            .map(Self::new)
            .map_err(|e| Error::io(native, e))
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Whether the path is absolute on this platform.
    pub fn is_absolute(&self) -> bool {
        self.to_native().is_absolute() || self.inner.starts_with('/')
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment = to_forward_slashes(segment);
        if self.inner.is_empty() {
            return Self { inner: segment };
        }
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment)
        } else {
            format!("{}/{}", self.inner, segment)
        };
        Self { inner: joined }
    }

    /// Resolve this path against `base` unless it is already absolute.
    pub fn resolve_against(&self, base: &NormalizedPath) -> Self {
        if self.is_absolute() {
            self.clone()
        } else {
            base.join(&self.inner)
        }
    }

    /// Get the parent directory.
    pub fn parent(&self) -> Option<Self> {
        let trimmed = self.inner.trim_end_matches('/');
        match trimmed.rfind('/') {
            Some(0) => Some(Self {
                inner: "/".to_string(),
            }),
            Some(idx) => Some(Self {
                inner: trimmed[..idx].to_string(),
            }),
            None => None,
        }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Get the extension if present.
    pub fn extension(&self) -> Option<&str> {
        self.file_name().and_then(|name| {
            let idx = name.rfind('.')?;
            if idx == 0 { None } else { Some(&name[idx + 1..]) }
        })
    }

    /// A sibling path whose file name is this one's with `suffix` appended.
    ///
    /// `report.php` with suffix `lock` becomes `report.php.lock`.
    pub fn with_suffix(&self, suffix: &str) -> Self {
        Self {
            inner: format!("{}.{}", self.inner.trim_end_matches('/'), suffix),
        }
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a regular file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl From<&str> for NormalizedPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NormalizedPath {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<PathBuf> for NormalizedPath {
    fn from(p: PathBuf) -> Self {
        Self::new(p)
    }
}

impl From<&Path> for NormalizedPath {
    fn from(p: &Path) -> Self {
        Self::new(p)
    }
}

#[cfg(windows)]
fn to_forward_slashes(path: &str) -> String {
    path.replace('\\', "/")
}

#[cfg(not(windows))]
fn to_forward_slashes(path: &str) -> String {
    path.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[cfg(windows)]
    #[test]
    fn backslashes_are_normalized() {
        let path = NormalizedPath::new("app\\Http\\Controller.php");
        assert_eq!(path.as_str(), "app/Http/Controller.php");
    }

    #[cfg(not(windows))]
    #[test]
    fn backslash_is_part_of_the_file_name() {
        let path = NormalizedPath::new("app/a\\b.php");
        assert_eq!(path.as_str(), "app/a\\b.php");
        assert_eq!(path.file_name(), Some("a\\b.php"));
        assert_eq!(NormalizedPath::new("app").join("a\\b.php").as_str(), "app/a\\b.php");
    }

    #[rstest]
    #[case("app/Http/Controller.php", Some("app/Http"))]
    #[case("/Controller.php", Some("/"))]
    #[case("Controller.php", None)]
    #[case("app/Http/", Some("app"))]
    fn parent_of(#[case] input: &str, #[case] expected: Option<&str>) {
        let parent = NormalizedPath::new(input).parent();
        assert_eq!(parent.as_ref().map(NormalizedPath::as_str), expected);
    }

    #[rstest]
    #[case("recipe.toml", Some("toml"))]
    #[case("dir/recipe.YAML", Some("YAML"))]
    #[case(".hidden", None)]
    #[case("noext", None)]
    fn extension_of(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(NormalizedPath::new(input).extension(), expected);
    }

    #[test]
    fn with_suffix_appends_to_file_name() {
        let path = NormalizedPath::new("app/Controller.php");
        assert_eq!(path.with_suffix("lock").as_str(), "app/Controller.php.lock");
    }

    #[test]
    fn resolve_against_keeps_absolute_paths() {
        let base = NormalizedPath::new("/recipes");
        assert_eq!(
            NormalizedPath::new("/srv/app.php").resolve_against(&base).as_str(),
            "/srv/app.php"
        );
        assert_eq!(
            NormalizedPath::new("app/x.php").resolve_against(&base).as_str(),
            "/recipes/app/x.php"
        );
    }

    #[test]
    fn join_onto_empty_path_yields_segment() {
        let base = NormalizedPath::new("");
        assert_eq!(base.join("file.txt").as_str(), "file.txt");
    }

    #[test]
    fn canonicalize_missing_path_is_io_error() {
        let err = NormalizedPath::new("/definitely/not/here.txt")
            .canonicalize()
            .unwrap_err();
        assert_eq!(err.io_kind(), Some(std::io::ErrorKind::NotFound));
    }
}
