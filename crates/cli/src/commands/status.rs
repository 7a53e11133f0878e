//! Status of a running daemon

use anyhow::{Context, Result, bail};
use daemon::{Client, is_running};
use sentiment_core::Config;

fn format_duration(secs: u64) -> String {
  let (hours, rest) = (secs / 3600, secs % 3600);
  let (minutes, seconds) = (rest / 60, rest % 60);
  if hours > 0 {
    format!("{}h {}m {}s", hours, minutes, seconds)
  } else if minutes > 0 {
    format!("{}m {}s", minutes, seconds)
  } else {
    format!("{}s", seconds)
  }
}

/// Query a running daemon and print its status
pub async fn cmd_status(config: &Config) -> Result<()> {
  let addr = config.socket_addr();
  if !is_running(&addr) {
    bail!("Daemon is not running on {}. Start it with: sentimentd serve", addr);
  }

  let mut client = Client::connect(&addr).await.context("Failed to connect to daemon")?;
  let response = client
    .call("status", serde_json::json!({}))
    .await
    .context("Failed to get status")?;

  if let Some(error) = response.error {
    bail!("Status request failed ({}): {}", error.code, error.message);
  }
  let Some(result) = response.result else {
    bail!("Daemon returned an empty status");
  };

  println!("sentimentd status");
  println!("=================\n");

  if let Some(version) = result.get("version").and_then(|v| v.as_str()) {
    println!("Version:      {}", version);
  }
  if let Some(status) = result.get("status").and_then(|v| v.as_str()) {
    println!("Status:       {}", status);
  }
  if let Some(uptime) = result.get("uptime_secs").and_then(|v| v.as_u64()) {
    println!("Uptime:       {}", format_duration(uptime));
  }
  if let Some(hooks) = result.get("hooks").and_then(|v| v.as_array()) {
    let ids: Vec<&str> = hooks.iter().filter_map(|v| v.as_str()).collect();
    println!("Hooks:        {}", if ids.is_empty() { "(none)".to_string() } else { ids.join(", ") });
  }
  println!(
    "Default hook: {}",
    result.get("default_hook").and_then(|v| v.as_str()).unwrap_or("(none)")
  );

  if let Some(stats) = result.get("stats") {
    let count = |name: &str| stats.get(name).and_then(|v| v.as_u64()).unwrap_or(0);
    println!();
    println!("--- Requests ---");
    println!("Analyze:      {}", count("analyze_requests"));
    println!(
      "Tasks:        {} ({} ok, {} failed)",
      count("task_requests"),
      count("task_successes"),
      count("task_failures")
    );
    println!("Hook calls:   {}", count("hook_calls"));
  }

  Ok(())
}
