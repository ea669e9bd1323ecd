//! Logging bootstrap.
//!
//! The library itself only emits `tracing` events; embedders bring their own
//! subscriber. This module is the batteries-included setup the CLI uses:
//! console output plus a non-blocking session log file, filtered through
//! `RUST_LOG` (default `info`).

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Default directory for session log files.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Default session log file name.
pub const DEFAULT_LOG_FILE: &str = "trustfix.log";

/// Keeps the non-blocking file writer alive.
///
/// Dropping the guard flushes and closes the log file.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber: stderr plus a fresh log file.
///
/// The previous session's file is truncated. Call once per process; the
/// returned guard must outlive all logging.
///
/// # Errors
///
/// Returns an error when the log directory cannot be created or the file
/// cannot be truncated.
pub fn init_logging(log_dir: &str, log_file: &str) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;
    fs::write(Path::new(log_dir).join(log_file), "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false);

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(io::stderr);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
