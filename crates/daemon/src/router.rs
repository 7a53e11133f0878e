use crate::server::ShutdownHandle;
use crate::stats::Stats;
use chrono::{DateTime, Utc};
use hooks::TaskRunner;
use sentiment_core::{AnalyseRequest, TaskRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// JSON-RPC style request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
  #[serde(default)]
  pub id: Option<serde_json::Value>,
  pub method: String,
  #[serde(default)]
  pub params: serde_json::Value,
}

/// JSON-RPC style response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<serde_json::Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub result: Option<serde_json::Value>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub error: Option<RpcError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcError {
  pub code: i32,
  pub message: String,
}

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const INVALID_PARAMS: i32 = -32602;
pub const INTERNAL_ERROR: i32 = -32603;
pub const SERVER_ERROR: i32 = -32000;

impl Response {
  pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
    Self {
      id,
      result: Some(result),
      error: None,
    }
  }

  pub fn error(id: Option<serde_json::Value>, code: i32, message: &str) -> Self {
    Self {
      id,
      result: None,
      error: Some(RpcError {
        code,
        message: message.to_string(),
      }),
    }
  }

  fn json<T: Serialize>(id: Option<serde_json::Value>, value: &T) -> Self {
    match serde_json::to_value(value) {
      Ok(result) => Self::success(id, result),
      Err(e) => Self::error(id, INTERNAL_ERROR, &format!("Failed to encode result: {}", e)),
    }
  }
}

/// Request router for the daemon
pub struct Router {
  runner: TaskRunner,
  stats: Arc<Stats>,
  started_at: DateTime<Utc>,
  shutdown_handle: Arc<Mutex<Option<ShutdownHandle>>>,
}

impl Router {
  /// `runner` should fetch through a source that reports into `stats`.
  pub fn new(runner: TaskRunner, stats: Arc<Stats>) -> Self {
    Self {
      runner,
      stats,
      started_at: Utc::now(),
      shutdown_handle: Arc::new(Mutex::new(None)),
    }
  }

  /// Set the shutdown handle (called after server is created)
  pub async fn set_shutdown_handle(&self, handle: ShutdownHandle) {
    let mut guard = self.shutdown_handle.lock().await;
    *guard = Some(handle);
  }

  pub fn stats(&self) -> &Arc<Stats> {
    &self.stats
  }

  /// Handle an incoming request
  pub async fn handle(&self, request: Request) -> Response {
    debug!("Handling request: {}", request.method);

    match request.method.as_str() {
      "ping" => Response::success(request.id, serde_json::json!("pong")),
      "status" => self.handle_status(request),
      "shutdown" => self.handle_shutdown(request).await,

      "analyze" => self.handle_analyze(request),
      "task" => self.handle_task(request).await,

      _ => {
        warn!("Unknown method: {}", request.method);
        Response::error(request.id, METHOD_NOT_FOUND, &format!("Method not found: {}", request.method))
      }
    }
  }

  fn handle_analyze(&self, request: Request) -> Response {
    self.stats.record_analyze();

    // Missing params are the same as `{}`
    let params: AnalyseRequest = if request.params.is_null() {
      AnalyseRequest::default()
    } else {
      match serde_json::from_value(request.params) {
        Ok(params) => params,
        Err(e) => return Response::error(request.id, INVALID_PARAMS, &format!("Invalid params: {}", e)),
      }
    };
    if params.text.is_empty() {
      return Response::error(request.id, INVALID_PARAMS, "no text passed");
    }

    let analysis = self.runner.analyse(&params.text);
    Response::json(request.id, &analysis)
  }

  async fn handle_task(&self, request: Request) -> Response {
    self.stats.record_task();

    let task: TaskRequest = match serde_json::from_value(request.params) {
      Ok(task) => task,
      Err(e) => {
        self.stats.record_failure();
        return Response::error(request.id, INVALID_PARAMS, &format!("Invalid params: {}", e));
      }
    };
    if task.record_id.is_empty() {
      self.stats.record_failure();
      return Response::error(request.id, INVALID_PARAMS, "Invalid params: recordingId is empty");
    }

    match self.runner.run(&task).await {
      Ok(result) => {
        self.stats.record_success();
        Response::json(request.id, &result)
      }
      Err(e) => {
        self.stats.record_failure();
        warn!("Task for record {} failed: {}", task.record_id, e);
        Response::error(request.id, e.code(), &e.to_string())
      }
    }
  }

  fn handle_status(&self, request: Request) -> Response {
    let registry = self.runner.registry();
    let uptime = (Utc::now() - self.started_at).num_seconds().max(0);

    let status = serde_json::json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": self.started_at.to_rfc3339(),
        "uptime_secs": uptime,
        "model": self.runner.model().name(),
        "hooks": registry.ids().collect::<Vec<_>>(),
        "default_hook": registry.default_hook(),
        "stats": self.stats.snapshot(),
    });
    Response::success(request.id, status)
  }

  async fn handle_shutdown(&self, request: Request) -> Response {
    info!("Shutdown requested via RPC");
    let guard = self.shutdown_handle.lock().await;
    if let Some(ref handle) = *guard {
      handle.shutdown();
      Response::success(request.id, serde_json::json!({"status": "shutting_down"}))
    } else {
      Response::error(request.id, SERVER_ERROR, "Shutdown handle not available")
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::stats::CountingSource;
  use async_trait::async_trait;
  use hooks::{HookError, HookRegistry, HookSource, RawHookResponse};
  use pretty_assertions::assert_eq;
  use scoring::LexiconModel;
  use sentiment_core::HookDescriptor;
  use std::collections::BTreeMap;

  struct Canned(&'static str);

  #[async_trait]
  impl HookSource for Canned {
    async fn fetch(&self, _hook: &HookDescriptor, _record_id: &str) -> Result<RawHookResponse, HookError> {
      Ok(RawHookResponse::from_body(self.0))
    }
  }

  fn router(body: &'static str) -> Router {
    let mut hooks = BTreeMap::new();
    hooks.insert(
      "comment".to_string(),
      HookDescriptor::new("https://example.com/comments/{}").with_key("text"),
    );
    hooks.insert(
      "transcript".to_string(),
      HookDescriptor::new("https://example.com/transcripts/{}").with_timed(true),
    );
    let registry = Arc::new(HookRegistry::new(hooks, "comment"));

    let stats = Arc::new(Stats::new());
    let source = Arc::new(CountingSource::new(Arc::new(Canned(body)), Arc::clone(&stats)));
    let runner = TaskRunner::new(registry, source, Arc::new(LexiconModel::new()));
    Router::new(runner, stats)
  }

  fn request(method: &str, params: serde_json::Value) -> Request {
    Request {
      id: Some(serde_json::json!(1)),
      method: method.to_string(),
      params,
    }
  }

  fn error_code(response: &Response) -> i32 {
    response.error.as_ref().map(|e| e.code).unwrap_or_default()
  }

  #[test]
  fn test_response_success() {
    let response = Response::success(Some(serde_json::json!(1)), serde_json::json!("test"));
    assert!(response.result.is_some());
    assert!(response.error.is_none());
  }

  #[test]
  fn test_response_error() {
    let response = Response::error(Some(serde_json::json!(1)), -1, "test error");
    assert!(response.result.is_none());
    assert_eq!(response.error.as_ref().unwrap().code, -1);
  }

  #[tokio::test]
  async fn test_ping() {
    let response = router("").handle(request("ping", serde_json::json!({}))).await;
    assert_eq!(response.result.unwrap(), serde_json::json!("pong"));
  }

  #[tokio::test]
  async fn test_unknown_method() {
    let response = router("").handle(request("unknown_method", serde_json::json!({}))).await;
    assert_eq!(error_code(&response), METHOD_NOT_FOUND);
  }

  #[tokio::test]
  async fn test_analyze() {
    let router = router("");
    let response = router
      .handle(request("analyze", serde_json::json!({"text": "I am happy."})))
      .await;

    let result = response.result.unwrap();
    assert_eq!(result["score"], 1);
    assert_eq!(result["words"].as_array().map(Vec::len), Some(3));
    assert_eq!(router.stats().snapshot().analyze_requests, 1);
  }

  #[tokio::test]
  async fn test_analyze_without_text() {
    let router = router("");
    for params in [
      serde_json::json!({}),
      serde_json::json!({"text": ""}),
      serde_json::Value::Null,
    ] {
      let response = router.handle(request("analyze", params)).await;
      assert_eq!(error_code(&response), INVALID_PARAMS);
      assert_eq!(response.error.unwrap().message, "no text passed");
    }
  }

  #[tokio::test]
  async fn test_analyze_malformed_params() {
    let router = router("");
    for params in [serde_json::json!({"text": 5}), serde_json::json!("Life is good.")] {
      let response = router.handle(request("analyze", params)).await;
      assert_eq!(error_code(&response), INVALID_PARAMS);
      let message = response.error.unwrap().message;
      assert!(message.starts_with("Invalid params: "), "message: {}", message);
    }
    assert_eq!(router.stats().snapshot().analyze_requests, 2);
  }

  #[tokio::test]
  async fn test_task_keyed_text() {
    let router = router(r#"{"text": "Life is good."}"#);
    let response = router
      .handle(request("task", serde_json::json!({"recordingId": "42"})))
      .await;

    let result = response.result.unwrap();
    assert_eq!(result["score"], 1);
    assert!(result.get("series").is_none());

    let stats = router.stats().snapshot();
    assert_eq!(stats.task_requests, 1);
    assert_eq!(stats.hook_calls, 1);
    assert_eq!(stats.task_successes, 1);
  }

  #[tokio::test]
  async fn test_task_series() {
    let router = router(r#"[{"start": 0, "end": 1, "text": "I am happy."}, {"start": 1, "end": 2, "text": "I am sad."}]"#);
    let response = router
      .handle(request(
        "task",
        serde_json::json!({"recordingId": "42", "hookId": "transcript"}),
      ))
      .await;

    let result = response.result.unwrap();
    assert!(result.get("metadata").is_some());
    assert_eq!(result["series"][0]["score"], 1);
    assert_eq!(result["series"][1]["score"], 0);
    assert_eq!(result["series"][1]["start"], 1.0);
  }

  #[tokio::test]
  async fn test_task_unknown_hook_skips_fetch() {
    let router = router("unused");
    let response = router
      .handle(request("task", serde_json::json!({"recordingId": "1", "hookId": "nope"})))
      .await;

    assert_eq!(error_code(&response), -32004);
    let stats = router.stats().snapshot();
    assert_eq!(stats.hook_calls, 0);
    assert_eq!(stats.task_failures, 1);
  }

  #[tokio::test]
  async fn test_task_shape_error() {
    let router = router(r#"{"other": "x"}"#);
    let response = router
      .handle(request("task", serde_json::json!({"recordingId": "1"})))
      .await;

    assert_eq!(error_code(&response), -32003);
    assert!(response.result.is_none());
  }

  #[tokio::test]
  async fn test_task_invalid_params() {
    let router = router("");
    let missing = router.handle(request("task", serde_json::json!({"hookId": "comment"}))).await;
    assert_eq!(error_code(&missing), INVALID_PARAMS);

    let empty = router.handle(request("task", serde_json::json!({"recordingId": ""}))).await;
    assert_eq!(error_code(&empty), INVALID_PARAMS);
    assert_eq!(router.stats().snapshot().hook_calls, 0);
  }

  #[tokio::test]
  async fn test_status() {
    let router = router("");
    let response = router.handle(request("status", serde_json::json!({}))).await;

    let result = response.result.unwrap();
    assert_eq!(result["status"], "running");
    assert_eq!(result["hooks"], serde_json::json!(["comment", "transcript"]));
    assert_eq!(result["default_hook"], "comment");
    assert_eq!(result["stats"]["task_requests"], 0);
    assert!(result["uptime_secs"].as_i64().is_some());
  }

  #[tokio::test]
  async fn test_shutdown_without_handle() {
    let response = router("").handle(request("shutdown", serde_json::json!({}))).await;
    assert_eq!(error_code(&response), SERVER_ERROR);
  }
}
