use crate::router::Router;
use crate::server::Server;
use crate::stats::{CountingSource, Stats};
use hooks::{HookFetcher, HookRegistry, TaskRunner};
use scoring::{SentimentModel, default_model};
use sentiment_core::Config;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::signal;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum LifecycleError {
  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),
  #[error("Server error: {0}")]
  Server(#[from] crate::server::ServerError),
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct DaemonConfig {
  /// `host:port` to listen on
  pub addr: String,
  /// Upper bound on a single hook fetch
  pub fetch_timeout: Duration,
  pub registry: Arc<HookRegistry>,
}

impl DaemonConfig {
  pub fn from_config(config: &Config) -> Self {
    Self {
      addr: config.socket_addr(),
      fetch_timeout: config.fetch_timeout(),
      registry: Arc::new(HookRegistry::from_config(config)),
    }
  }
}

impl Default for DaemonConfig {
  fn default() -> Self {
    Self::from_config(&Config::default())
  }
}

/// Build a task runner that fetches over HTTP and reports every fetch into `stats`.
pub fn build_runner(
  registry: Arc<HookRegistry>,
  fetch_timeout: Duration,
  model: Arc<dyn SentimentModel>,
  stats: Arc<Stats>,
) -> TaskRunner {
  let fetcher = Arc::new(HookFetcher::new().with_timeout(fetch_timeout));
  let source = Arc::new(CountingSource::new(fetcher, stats));
  TaskRunner::new(registry, source, model)
}

/// Daemon lifecycle manager
pub struct Daemon {
  config: DaemonConfig,
  stats: Arc<Stats>,
}

impl Daemon {
  pub fn new(config: DaemonConfig) -> Self {
    Self {
      config,
      stats: Arc::new(Stats::new()),
    }
  }

  /// Run the daemon until ctrl-c or a `shutdown` request
  pub async fn run(&mut self) -> Result<(), LifecycleError> {
    info!("Starting sentimentd");
    info!("Address: {}", self.config.addr);
    info!("Fetch timeout: {:?}", self.config.fetch_timeout);

    let registry = Arc::clone(&self.config.registry);
    match registry.default_hook() {
      Some(id) => info!("Loaded {} hooks (default '{}')", registry.len(), id),
      None => warn!("No hooks configured; task requests will fail"),
    }

    let model = default_model();
    info!("Using sentiment model: {}", model.name());

    let runner = build_runner(registry, self.config.fetch_timeout, model, Arc::clone(&self.stats));
    let router = Arc::new(Router::new(runner, Arc::clone(&self.stats)));

    let server = Server::bind(&self.config.addr, Arc::clone(&router)).await?;
    let shutdown = server.shutdown_handle();

    // Give the router the shutdown handle so it can process shutdown requests
    router.set_shutdown_handle(shutdown.clone()).await;

    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
      if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for ctrl-c: {}", e);
        return;
      }
      info!("Received ctrl-c, shutting down...");
      shutdown_clone.shutdown();
    });

    server.run().await?;

    let stats = self.stats.snapshot();
    info!(
      "Daemon shutdown complete ({} tasks, {} failed, {} hook calls)",
      stats.task_requests, stats.task_failures, stats.hook_calls
    );

    Ok(())
  }
}

/// Check if a daemon is already listening on `addr`
pub fn is_running(addr: &str) -> bool {
  std::net::TcpStream::connect(addr).is_ok()
}
