use crate::config::LoggingSettings;
use crate::error::{QueryError, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing::debug;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. Log lines go to stderr (and optionally a
/// file) so stdout carries only query output.
///
/// `verbose` forces `debug`; otherwise `RUST_LOG` wins over the configured level.
pub fn init(settings: &LoggingSettings, verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&settings.level))
            .map_err(|e| QueryError::Config(format!("Invalid log level: {}", e)))?
    };

    let stderr_layer = fmt::layer().with_writer(std::io::stderr).with_target(false);

    let file_layer = match &settings.log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| QueryError::Config(format!("Logging already initialized: {}", e)))?;

    debug!(level = %settings.level, verbose, "Logging initialized");
    Ok(())
}
