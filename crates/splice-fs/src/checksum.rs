//! SHA-256 checksums in the `sha256:<hex>` form
//!
//! Used to notice a target changing between read and write, and to verify
//! backups before restoring them.

use sha2::{Digest, Sha256};

use crate::{Error, NormalizedPath, Result};

const PREFIX: &str = "sha256:";

/// Checksum of string content.
pub fn compute_content_checksum(content: &str) -> String {
    compute_bytes_checksum(content.as_bytes())
}

/// Checksum of raw bytes.
pub fn compute_bytes_checksum(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{}{:x}", PREFIX, hasher.finalize())
}

/// Checksum of a file's current contents.
pub fn compute_file_checksum(path: &NormalizedPath) -> Result<String> {
    let native_path = path.to_native();
    let bytes = std::fs::read(&native_path).map_err(|e| Error::io(&native_path, e))?;
    Ok(compute_bytes_checksum(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_checksum_known_value() {
        assert_eq!(
            compute_content_checksum("hello world"),
            "sha256:b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn different_content_different_checksum() {
        assert_ne!(
            compute_content_checksum("]);"),
            compute_content_checksum("]); ")
        );
    }

    #[test]
    fn file_checksum_matches_content_checksum() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("controller.php");
        std::fs::write(&path, "<?php\nreturn [];\n").unwrap();

        let file_checksum = compute_file_checksum(&NormalizedPath::new(&path)).unwrap();
        assert_eq!(file_checksum, compute_content_checksum("<?php\nreturn [];\n"));
    }

    #[test]
    fn file_checksum_of_missing_file_is_io_error() {
        let err = compute_file_checksum(&NormalizedPath::new("/no/such/file")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
