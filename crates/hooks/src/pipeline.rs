use crate::{HookError, HookRegistry, HookSource, assemble, interpret};
use scoring::SentimentModel;
use sentiment_core::{Analysis, TaskRequest, TaskResult};
use std::sync::Arc;
use tracing::debug;

/// Runs a task end to end: resolve, fetch, interpret, score, assemble.
///
/// Each run is sequential and shares nothing mutable with other runs.
#[derive(Clone)]
pub struct TaskRunner {
  registry: Arc<HookRegistry>,
  source: Arc<dyn HookSource>,
  model: Arc<dyn SentimentModel>,
}

impl TaskRunner {
  pub fn new(registry: Arc<HookRegistry>, source: Arc<dyn HookSource>, model: Arc<dyn SentimentModel>) -> Self {
    Self {
      registry,
      source,
      model,
    }
  }

  pub fn registry(&self) -> &Arc<HookRegistry> {
    &self.registry
  }

  pub fn model(&self) -> &Arc<dyn SentimentModel> {
    &self.model
  }

  /// Score caller-supplied text directly.
  pub fn analyse(&self, text: &str) -> Analysis {
    self.model.analyse(text)
  }

  pub async fn run(&self, request: &TaskRequest) -> Result<TaskResult, HookError> {
    let hook = self.registry.resolve(request.hook_id.as_deref())?;
    debug!("Task for record {} using hook '{}'", request.record_id, hook.id);

    let raw = self.source.fetch(hook.descriptor, &request.record_id).await?;
    let interpretation = interpret(hook.id, hook.descriptor, &raw)?;

    let whole = self.model.analyse(&interpretation.text);
    Ok(assemble(whole, interpretation.segments, |text| self.model.score(text)))
  }
}
