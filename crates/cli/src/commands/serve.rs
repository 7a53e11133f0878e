//! Daemon command

use anyhow::{Context, Result, bail};
use daemon::{Daemon, DaemonConfig, is_running};
use sentiment_core::Config;
use tracing::info;

/// Run the daemon in the foreground until ctrl-c or a `shutdown` request
pub async fn cmd_serve(config: &Config) -> Result<()> {
  let daemon_config = DaemonConfig::from_config(config);

  if is_running(&daemon_config.addr) {
    bail!("Something is already listening on {}", daemon_config.addr);
  }

  let mut daemon = Daemon::new(daemon_config);
  info!("Starting sentimentd daemon");
  daemon.run().await.context("Failed to run daemon")?;

  Ok(())
}
