//! Apply command implementation

use std::path::Path;

use colored::Colorize;
use splice_core::{BlockPattern, NormalizedPath, ReplaceOutcome, ReplaceRequest, Replacer};
use splice_fs::io;

use crate::cli::{PatternArgs, PayloadArgs, WriteArgs};
use crate::error::{CliError, Result};

/// Run the apply command
pub fn run_apply(
    file: &Path,
    pattern: &PatternArgs,
    payload: &PayloadArgs,
    write: &WriteArgs,
) -> Result<()> {
    let pattern = BlockPattern::new(&pattern.marker, &pattern.delimiter)
        .map_err(splice_core::Error::from)?;
    let replacement = read_payload(payload)?;
    let request = ReplaceRequest::new(file, pattern, replacement);
    execute(&request, write)
}

/// Resolve the replacement text from the inline value or a file.
fn read_payload(payload: &PayloadArgs) -> Result<String> {
    match (&payload.replacement, &payload.replacement_file) {
        (Some(text), None) => Ok(text.clone()),
        (None, Some(path)) => Ok(io::read_text(&NormalizedPath::new(path))?),
        _ => Err(CliError::user(
            "exactly one of --replacement or --replacement-file is required",
        )),
    }
}

/// Replace according to `write` and report the outcome.
pub(crate) fn execute(request: &ReplaceRequest, write: &WriteArgs) -> Result<()> {
    let replacer = Replacer::new(write.options());
    let outcome = replacer.replace(request)?;
    report(&outcome, write.json)
}

fn report(outcome: &ReplaceOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    if outcome.dry_run {
        print_diff(&outcome.diff.unified);
        println!("{} {}", "Dry run:".yellow().bold(), outcome.summary());
        return Ok(());
    }

    println!("{} {}", "OK".green().bold(), outcome.summary());
    if let Some(backup) = &outcome.backup {
        println!("{}: {}", "Backup".dimmed(), backup.path);
    }
    Ok(())
}

fn print_diff(unified: &str) {
    for line in unified.lines() {
        if line.starts_with("+++") || line.starts_with("---") {
            println!("{}", line.bold());
        } else if line.starts_with('+') {
            println!("{}", line.green());
        } else if line.starts_with('-') {
            println!("{}", line.red());
        } else if line.starts_with("@@") {
            println!("{}", line.cyan());
        } else {
            println!("{line}");
        }
    }
}
