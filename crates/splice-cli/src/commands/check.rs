//! Check command implementation

use std::path::Path;

use colored::Colorize;
use splice_core::{BlockPattern, NormalizedPath, Replacer};

use crate::cli::PatternArgs;
use crate::error::Result;

/// Run the check command
///
/// Reports the span the pattern would replace. Fails like `apply` would when
/// the marker or delimiter is missing.
pub fn run_check(file: &Path, pattern: &PatternArgs, json: bool) -> Result<()> {
    let pattern = BlockPattern::new(&pattern.marker, &pattern.delimiter)
        .map_err(splice_core::Error::from)?;
    let report = Replacer::default().check(&NormalizedPath::new(file), &pattern)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} block found in {}",
        "OK".green().bold(),
        report.path.cyan()
    );
    println!(
        "{}:  {}-{}",
        "Lines".dimmed(),
        report.lines.first,
        report.lines.last
    );
    println!(
        "{}:  {}..{} ({} bytes)",
        "Bytes".dimmed(),
        report.span.start,
        report.span.end,
        report.removed_bytes
    );
    Ok(())
}
