//! Logging infrastructure for zonewatch.
//!
//! Provides structured logging with file output and optional console output:
//! - Writes to the configured log file (cleared on session start)
//! - Optionally mirrors to stderr, keeping stdout free for command output
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize logging system.
///
/// Creates the log directory if needed, clears the previous log file, and
/// installs the global subscriber.
///
/// # Arguments
///
/// * `log_dir` - Directory for the log file
/// * `log_file` - Log filename (e.g., "zonewatch.log")
/// * `stdout_enabled` - Also print events to the terminal (stderr)
/// * `debug` - Default to `debug` level instead of `info` when RUST_LOG is unset
///
/// # Errors
///
/// Returns error if the log directory cannot be created or the log file
/// cannot be cleared.
pub fn init_logging(
    log_dir: &Path,
    log_file: &str,
    stdout_enabled: bool,
    debug: bool,
) -> Result<LoggingGuard, io::Error> {
    prepare_log_file(log_dir, log_file)?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE);

    let console_layer = stdout_enabled.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_ansi(true)
            .compact()
    });

    tracing_subscriber::registry()
        .with(build_filter(debug))
        .with(file_layer)
        .with(console_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Create the log directory and truncate the log file.
///
/// Returns the full path of the log file.
pub fn prepare_log_file(log_dir: &Path, log_file: &str) -> Result<PathBuf, io::Error> {
    fs::create_dir_all(log_dir)?;
    let log_path = log_dir.join(log_file);
    fs::write(&log_path, "")?;
    Ok(log_path)
}

/// Split a configured log file path into (directory, file name).
///
/// A bare file name logs into the current directory.
pub fn split_log_path(path: &Path) -> (PathBuf, String) {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file = path
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| default_log_file().to_string());
    (dir, file)
}

/// Get default log file name.
pub fn default_log_file() -> &'static str {
    crate::config::DEFAULT_LOG_FILE_NAME
}

/// Env filter from RUST_LOG, falling back to `info` (or `debug`).
fn build_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if debug { "debug" } else { "info" }))
}
