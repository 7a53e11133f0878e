//! sentimentd - sentiment scoring over configured text hooks

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use sentiment_core::Config;

mod commands;
mod logging;

use commands::{cmd_analyze, cmd_config_init, cmd_config_show, cmd_hooks, cmd_serve, cmd_status, cmd_task};
use logging::{init_cli_logging, init_daemon_logging};

#[derive(Parser)]
#[command(name = "sentimentd")]
#[command(about = "Sentiment scoring service with pluggable text hooks")]
#[command(after_help = "\
QUICK START:
  sentimentd config --init          # Write a config template
  sentimentd serve                  # Start the daemon
  sentimentd task 42 --hook comment # Score one record without the daemon")]
struct Cli {
  /// Config file path or http(s) url (default: $SENTIMENTD_CONFIG, ./config.toml, user config)
  #[arg(short, long, global = true)]
  config: Option<String>,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Run the daemon
  Serve,
  /// Score text directly
  Analyze {
    /// Text to score
    text: String,
  },
  /// Fetch a record through a hook and score it
  Task {
    /// Recording id substituted into the hook url
    recording_id: String,
    /// Hook to use (default: the configured default hook)
    #[arg(long)]
    hook: Option<String>,
  },
  /// Show status of a running daemon
  Status,
  /// Show or initialize configuration
  Config {
    /// Write a config template
    #[arg(long)]
    init: bool,
    /// Show current effective config
    #[arg(long)]
    show: bool,
  },
  /// List configured hooks
  Hooks,
}

async fn load_config(explicit: Option<&str>) -> Result<Config> {
  Config::load_or_default(explicit)
    .await
    .context("Failed to load configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  // File logging for the daemon, console-only for other commands
  let _guard = match &cli.command {
    Commands::Serve => init_daemon_logging(),
    _ => {
      init_cli_logging();
      None
    }
  };

  let explicit = cli.config.as_deref();

  match cli.command {
    Commands::Serve => cmd_serve(&load_config(explicit).await?).await,
    Commands::Analyze { text } => cmd_analyze(&text).await,
    Commands::Task { recording_id, hook } => {
      cmd_task(&load_config(explicit).await?, &recording_id, hook.as_deref()).await
    }
    Commands::Status => cmd_status(&load_config(explicit).await?).await,
    Commands::Config { init, show } => {
      if init {
        cmd_config_init(explicit).await?;
      }
      // Bare `config` shows
      if show || !init {
        cmd_config_show(&load_config(explicit).await?, explicit).await?;
      }
      Ok(())
    }
    Commands::Hooks => cmd_hooks(&load_config(explicit).await?).await,
  }
}
