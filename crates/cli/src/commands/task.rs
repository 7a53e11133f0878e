//! One-shot scoring without a running daemon

use anyhow::{Context, Result, bail};
use daemon::{Stats, build_runner};
use hooks::HookRegistry;
use scoring::default_model;
use sentiment_core::{Config, TaskRequest};
use std::sync::Arc;
use tracing::debug;

/// Score text locally and print the analysis as JSON
pub async fn cmd_analyze(text: &str) -> Result<()> {
  if text.trim().is_empty() {
    bail!("no text passed");
  }

  let analysis = default_model().analyse(text);
  println!("{}", serde_json::to_string_pretty(&analysis)?);
  Ok(())
}

/// Run the hook pipeline in-process and print the result as JSON
pub async fn cmd_task(config: &Config, record_id: &str, hook: Option<&str>) -> Result<()> {
  if record_id.is_empty() {
    bail!("recording id must not be empty");
  }

  let stats = Arc::new(Stats::new());
  let runner = build_runner(
    Arc::new(HookRegistry::from_config(config)),
    config.fetch_timeout(),
    default_model(),
    Arc::clone(&stats),
  );

  let mut request = TaskRequest::new(record_id);
  if let Some(hook) = hook {
    request = request.with_hook(hook);
  }

  let result = runner
    .run(&request)
    .await
    .with_context(|| format!("Task for record {} failed", record_id))?;
  debug!("Task finished after {} hook call(s)", stats.snapshot().hook_calls);

  println!("{}", serde_json::to_string_pretty(&result)?);
  Ok(())
}
