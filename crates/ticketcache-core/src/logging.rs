//! Tracing setup for applications embedding the ticket cache.
//!
//! The library itself only emits `tracing` events; these helpers install a
//! subscriber for hosts that do not bring their own.

use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log file name prefix for the daily rolling file
const LOG_FILE_PREFIX: &str = "ticketcache.log";

fn env_filter(default_filter: &str) -> EnvFilter {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Initialize a stderr subscriber filtered by `RUST_LOG`, or `default_filter`
/// when it is unset.
pub fn init_tracing(default_filter: &str) -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter(default_filter))
        .try_init()
        .context("A global tracing subscriber is already installed")
}

/// Like `init_tracing`, but also writes to a daily rolling file in `log_dir`.
///
/// Keep the returned guard alive for the life of the program; dropping it
/// flushes and stops the file writer.
pub fn init_file_tracing(log_dir: &Path, default_filter: &str) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .with(env_filter(default_filter))
        .try_init()
        .context("A global tracing subscriber is already installed")?;

    Ok(guard)
}
