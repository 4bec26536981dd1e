//! Logging Infrastructure
//!
//! Console logging by default; daily rolling files when a log directory
//! is configured and exists. `RUST_LOG`, when set, overrides the
//! configured level with full filter directives.

use std::path::Path;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// File name prefix for rolled log files
const LOG_FILE_PREFIX: &str = "xprint-server";

/// Parse a level name, falling back to INFO
pub fn parse_level(level: &str) -> Level {
    level.trim().parse().unwrap_or(Level::INFO)
}

/// Initialize the global subscriber
///
/// Must be called once, before the first log line.
pub fn init_logger_with_file(log_level: &str, log_dir: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(parse_level(log_level).to_string()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = log_dir {
        if Path::new(dir).is_dir() {
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
        eprintln!("Log directory {} does not exist, logging to stdout", dir);
    }

    subscriber.init();
}
