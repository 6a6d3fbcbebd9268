//! Filesystem layer for block-splice
//!
//! Normalized paths, whole-file text I/O (atomic or in place), content
//! checksums, and format-agnostic loading of recipe files.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::{ConfigFormat, ConfigStore};
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::NormalizedPath;
