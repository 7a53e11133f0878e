//! Logging setup for CLI commands and the daemon

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const LOG_FILE: &str = "sentimentd.log";

/// Directory for daemon logs.
///
/// `DATA_DIR` wins, then `$XDG_DATA_HOME/sentimentd`, then the platform data dir.
pub fn data_dir() -> PathBuf {
  if let Ok(dir) = std::env::var("DATA_DIR") {
    return PathBuf::from(dir);
  }

  if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
    return PathBuf::from(xdg_data).join("sentimentd");
  }

  dirs::data_local_dir()
    .unwrap_or_else(|| PathBuf::from("."))
    .join("sentimentd")
}

fn env_filter() -> EnvFilter {
  EnvFilter::builder()
    .with_default_directive(tracing::Level::INFO.into())
    .from_env_lossy()
}

/// Initialize logging for CLI commands (console only)
pub fn init_cli_logging() {
  tracing_subscriber::fmt().with_env_filter(env_filter()).init();
}

/// Initialize logging for the daemon: console plus a daily rolling file.
///
/// Returns the guard that must be kept alive for the duration of the program
pub fn init_daemon_logging() -> Option<WorkerGuard> {
  let log_dir = data_dir();
  if std::fs::create_dir_all(&log_dir).is_err() {
    init_cli_logging();
    return None;
  }

  let file_appender = tracing_appender::rolling::daily(&log_dir, LOG_FILE);
  let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

  let console_layer = tracing_subscriber::fmt::layer().with_target(true).with_ansi(true);

  let file_layer = tracing_subscriber::fmt::layer()
    .with_target(true)
    .with_ansi(false)
    .with_writer(file_writer);

  tracing_subscriber::registry()
    .with(env_filter())
    .with(console_layer)
    .with(file_layer)
    .init();

  Some(guard)
}
