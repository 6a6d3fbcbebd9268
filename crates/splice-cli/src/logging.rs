use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::error::{CliError, Result};

/// Install the global tracing subscriber.
///
/// Logs go to stderr so that `--json` output on stdout stays parseable.
/// `--verbose` forces `debug`; otherwise `RUST_LOG` is honored, defaulting
/// to `warn`.
pub fn init(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| CliError::user(format!("failed to initialise logging: {e}")))?;

    tracing::debug!("verbose mode enabled");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_reports_error_instead_of_panicking() {
        // Only one global subscriber per process.
        let _ = init(false);
        assert!(init(false).is_err());
    }
}
