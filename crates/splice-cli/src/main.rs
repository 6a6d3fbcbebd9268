//! block-splice CLI
//!
//! Replaces a marker-bounded block of text in a file, directly or from a
//! recipe, with optional dry run and backups.

mod cli;
mod commands;
mod error;
mod logging;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    execute_command(cli.command)
}

fn execute_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Apply {
            file,
            pattern,
            payload,
            write,
        } => commands::run_apply(&file, &pattern, &payload, &write),
        Commands::Run { recipe, write } => commands::run_recipe(&recipe, &write),
        Commands::Check {
            file,
            pattern,
            json,
        } => commands::run_check(&file, &pattern, json),
        Commands::Restore { file, backup_dir } => commands::run_restore(&file, backup_dir.as_deref()),
    }
}
