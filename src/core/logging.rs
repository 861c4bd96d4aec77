//! Logging setup
//!
//! Two sinks:
//! - a daily rolling JSON log under the app data directory, at the level
//!   given by `RUST_LOG` (default `info`)
//! - stderr, errors only, so the interactive menu stays readable
//!
//! Library code logs through the `log` macros, which are bridged into
//! `tracing` here.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Layer};

/// Base name of the rolling log file.
pub const LOG_FILE_PREFIX: &str = "character-forge.log";

/// Directory the rolling log is written to.
pub fn log_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("character-forge").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// Install the global subscriber. Keep the returned guard alive for the
/// lifetime of the program or buffered file output is lost.
pub fn init() -> WorkerGuard {
    let log_dir = log_dir();
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(&log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_filter(env_filter);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .compact()
        .without_time()
        .with_target(false)
        .with_filter(LevelFilter::ERROR);

    let subscriber = tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {}", e);
    }

    // Route `log` macros into the subscriber above.
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize LogTracer: {}", e);
    }

    log::info!(
        "{} v{} logging to {}",
        crate::NAME,
        crate::VERSION,
        log_dir.display()
    );

    guard
}
