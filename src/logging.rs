//! Log setup. The terminal belongs to the game screen, so logs only ever go
//! to a file chosen on the command line.

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Map `-v` repetitions to a default level; `RUST_LOG` still wins when set
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Plain-text subscriber writing to `file`
pub fn file_subscriber(file: File, verbose: u8) -> impl Subscriber + Send + Sync + 'static {
    let filter = EnvFilter::builder()
        .with_default_directive(level_for_verbosity(verbose).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .finish()
}

/// Install the global subscriber. Without a log file nothing is installed and
/// every event is discarded.
pub fn init(log_file: Option<&Path>, verbose: u8) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing::subscriber::set_global_default(file_subscriber(file, verbose))
        .context("Failed to install log subscriber")?;

    Ok(())
}
