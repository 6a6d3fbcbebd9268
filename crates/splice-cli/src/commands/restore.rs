//! Restore command implementation

use std::path::Path;

use colored::Colorize;
use splice_core::{NormalizedPath, ReplaceOptions, Replacer};

use crate::error::Result;

/// Put back the most recent backup of `file`
pub fn run_restore(file: &Path, backup_dir: Option<&Path>) -> Result<()> {
    let options = match backup_dir {
        Some(dir) => ReplaceOptions::default().with_backup_dir(NormalizedPath::new(dir)),
        None => ReplaceOptions::default(),
    };
    let record = Replacer::new(options).restore_latest(&NormalizedPath::new(file))?;

    println!(
        "{} restored {} from {}",
        "OK".green().bold(),
        record.metadata.original.cyan(),
        record.path
    );
    println!(
        "{}: {}",
        "Taken".dimmed(),
        record.metadata.created.format("%Y-%m-%d %H:%M:%S UTC")
    );
    Ok(())
}
