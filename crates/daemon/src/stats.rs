use async_trait::async_trait;
use hooks::{HookError, HookFetcher, HookSource, RawHookResponse};
use sentiment_core::HookDescriptor;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide request counters, shared by every connection.
#[derive(Debug, Default)]
pub struct Stats {
  analyze_requests: AtomicU64,
  task_requests: AtomicU64,
  hook_calls: AtomicU64,
  task_successes: AtomicU64,
  task_failures: AtomicU64,
}

/// Point-in-time copy of [`Stats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
  pub analyze_requests: u64,
  pub task_requests: u64,
  pub hook_calls: u64,
  pub task_successes: u64,
  pub task_failures: u64,
}

impl Stats {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn record_analyze(&self) {
    self.analyze_requests.fetch_add(1, Ordering::Relaxed);
  }

  pub fn record_task(&self) {
    self.task_requests.fetch_add(1, Ordering::Relaxed);
  }

  pub fn record_hook_call(&self) {
    self.hook_calls.fetch_add(1, Ordering::Relaxed);
  }

  pub fn record_success(&self) {
    self.task_successes.fetch_add(1, Ordering::Relaxed);
  }

  pub fn record_failure(&self) {
    self.task_failures.fetch_add(1, Ordering::Relaxed);
  }

  pub fn snapshot(&self) -> StatsSnapshot {
    StatsSnapshot {
      analyze_requests: self.analyze_requests.load(Ordering::Relaxed),
      task_requests: self.task_requests.load(Ordering::Relaxed),
      hook_calls: self.hook_calls.load(Ordering::Relaxed),
      task_successes: self.task_successes.load(Ordering::Relaxed),
      task_failures: self.task_failures.load(Ordering::Relaxed),
    }
  }
}

/// Wraps a hook source and counts every fetch that is actually issued.
///
/// A record id that doesn't render to a valid url never reaches the inner source.
pub struct CountingSource {
  inner: Arc<dyn HookSource>,
  stats: Arc<Stats>,
}

impl CountingSource {
  pub fn new(inner: Arc<dyn HookSource>, stats: Arc<Stats>) -> Self {
    Self { inner, stats }
  }
}

#[async_trait]
impl HookSource for CountingSource {
  async fn fetch(&self, hook: &HookDescriptor, record_id: &str) -> Result<RawHookResponse, HookError> {
    HookFetcher::build_url(hook, record_id)?;
    self.stats.record_hook_call();
    self.inner.fetch(hook, record_id).await
  }
}
