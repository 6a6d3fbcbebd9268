//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use splice_core::{NormalizedPath, ReplaceOptions, WriteMode};

/// block-splice - replace a marker-bounded block of text in a file
#[derive(Parser, Debug)]
#[command(name = "splice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Replace the block in FILE
    ///
    /// The block runs from the first MARKER to the first DELIMITER after it,
    /// both included.
    ///
    /// Examples:
    ///   splice apply Controller.php -m "return [" -d "];" -r "return [];"
    ///   splice apply Controller.php -m "return [" -d "];" -f block.txt --dry-run
    Apply {
        /// File to edit
        file: PathBuf,

        #[command(flatten)]
        pattern: PatternArgs,

        #[command(flatten)]
        payload: PayloadArgs,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Apply a recipe file (TOML, JSON or YAML)
    Run {
        /// Recipe naming target, marker, delimiter and payload
        recipe: PathBuf,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Show where the block is without changing anything
    Check {
        /// File to inspect
        file: PathBuf,

        #[command(flatten)]
        pattern: PatternArgs,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Put back the most recent backup of FILE
    Restore {
        /// File to restore
        file: PathBuf,

        /// Directory holding the backups (default: .splice-backups beside the file)
        #[arg(long, value_name = "DIR", env = "SPLICE_BACKUP_DIR")]
        backup_dir: Option<PathBuf>,
    },
}

/// The literal strings bounding the block
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct PatternArgs {
    /// Literal text starting the block
    #[arg(short, long, allow_hyphen_values = true)]
    pub marker: String,

    /// Literal text ending the block, searched from the marker onwards
    #[arg(short, long, allow_hyphen_values = true)]
    pub delimiter: String,
}

/// Where the replacement text comes from
#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[group(required = true, multiple = false)]
pub struct PayloadArgs {
    /// Replacement text, inserted verbatim
    #[arg(short, long, allow_hyphen_values = true)]
    pub replacement: Option<String>,

    /// File whose content is the replacement text
    #[arg(short = 'f', long, value_name = "PATH")]
    pub replacement_file: Option<PathBuf>,
}

/// How the result is written
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteArgs {
    /// Show the diff without writing
    #[arg(long)]
    pub dry_run: bool,

    /// Keep a copy of the original before writing
    #[arg(long)]
    pub backup: bool,

    /// Directory for backups (default: .splice-backups beside the file)
    #[arg(long, value_name = "DIR", env = "SPLICE_BACKUP_DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Truncate and write the file directly instead of replacing it atomically
    #[arg(long)]
    pub in_place: bool,

    /// Output as JSON for scripting
    #[arg(long)]
    pub json: bool,
}

impl WriteArgs {
    pub fn options(&self) -> ReplaceOptions {
        let write_mode = if self.in_place {
            WriteMode::InPlace
        } else {
            WriteMode::Atomic
        };
        let options = ReplaceOptions::default()
            .with_write_mode(write_mode)
            .with_backup(self.backup)
            .with_dry_run(self.dry_run);
        match &self.backup_dir {
            Some(dir) => options.with_backup_dir(NormalizedPath::new(dir)),
            None => options,
        }
    }
}
