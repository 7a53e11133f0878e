//! End-to-end task runs: registry lookup through result assembly.

#[cfg(test)]
mod tests {
  use crate::{
    HookError, HookFetcher, HookRegistry, HookSource, TaskRunner,
    __tests__::helpers::{StubSource, serve_once},
  };
  use pretty_assertions::assert_eq;
  use scoring::{LexiconModel, SentimentModel};
  use sentiment_core::{HookDescriptor, TaskRequest, TaskResult};
  use std::collections::BTreeMap;
  use std::sync::Arc;

  fn registry_with(hooks: Vec<(&str, HookDescriptor)>, default: &str) -> Arc<HookRegistry> {
    let hooks: BTreeMap<String, HookDescriptor> = hooks.into_iter().map(|(id, h)| (id.to_string(), h)).collect();
    Arc::new(HookRegistry::new(hooks, default))
  }

  fn runner(registry: Arc<HookRegistry>, source: Arc<dyn HookSource>) -> TaskRunner {
    TaskRunner::new(registry, source, Arc::new(LexiconModel::new()))
  }

  const FIXTURE: &str = r#"[
    {"start": 0.0, "end": 1.2, "text": "I am happy."},
    {"start": 1.2, "end": 2.0, "text": "I am sad."},
    {"start": 2.0, "end": 3.5, "text": "Life is good."}
  ]"#;

  /// An unknown hook id fails before any fetch is attempted.
  #[tokio::test]
  async fn test_unknown_hook_makes_no_call() {
    let source = Arc::new(StubSource::new("ignored"));
    let registry = registry_with(vec![("comment", HookDescriptor::new("https://example.com/{}"))], "comment");
    let runner = runner(registry, source.clone());

    let err = runner
      .run(&TaskRequest::new("1").with_hook("nope"))
      .await
      .unwrap_err();

    assert!(matches!(err, HookError::HookNotFound(ref id) if id == "nope"));
    assert_eq!(source.calls(), 0);
  }

  /// Without a hook id the default hook is used and the record id is passed through.
  #[tokio::test]
  async fn test_default_hook_plain_text() {
    let source = Arc::new(StubSource::new("What a wonderful day"));
    let registry = registry_with(
      vec![
        ("comment", HookDescriptor::new("https://example.com/c/{}")),
        ("post", HookDescriptor::new("https://example.com/p/{}").with_key("body")),
      ],
      "comment",
    );
    let runner = runner(registry, source.clone());

    let result = runner.run(&TaskRequest::new("rec-7")).await.unwrap();

    let expected = LexiconModel::new().analyse("What a wonderful day");
    assert_eq!(result, TaskResult::Document(expected));
    assert_eq!(source.records(), vec!["rec-7".to_string()]);
  }

  #[tokio::test]
  async fn test_keyed_text_scored_as_document() {
    let source = Arc::new(StubSource::new(r#"{"body": "This is terrible", "id": 3}"#));
    let registry = registry_with(
      vec![("post", HookDescriptor::new("https://example.com/p/{}").with_key("body"))],
      "post",
    );

    let result = runner(registry, source).run(&TaskRequest::new("3")).await.unwrap();
    let document = result.document();
    assert_eq!(document.score, 0);
    assert_eq!(document.words.len(), 3);
    assert!(result.series().is_none());
  }

  /// Whole-document scoring of a series equals scoring the joined text.
  #[tokio::test]
  async fn test_series_fixture_round_trip() {
    let source = Arc::new(StubSource::new(FIXTURE));
    let registry = registry_with(
      vec![("transcript", HookDescriptor::new("https://example.com/t/{}").with_timed(true))],
      "transcript",
    );

    let result = runner(registry, source).run(&TaskRequest::new("1")).await.unwrap();

    let model = LexiconModel::new();
    let expected = model.analyse("I am happy. I am sad. Life is good. ");
    match result {
      TaskResult::Series { metadata, series } => {
        assert_eq!(metadata.score, expected.score);
        assert_eq!(metadata.words.len(), expected.words.len());
        assert_eq!(
          series.iter().map(|s| s.text.as_str()).collect::<Vec<_>>(),
          vec!["I am happy.", "I am sad.", "Life is good."]
        );
        assert_eq!(series.iter().map(|s| s.score).collect::<Vec<_>>(), vec![Some(1), Some(0), Some(1)]);
        assert_eq!(series[1].start, 1.2);
        assert_eq!(series[2].end, 3.5);
      }
      other => panic!("expected a series result, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_keyed_series_scaled() {
    let body = format!(r#"{{"segments": {}}}"#, FIXTURE);
    let source = Arc::new(StubSource::new(&body));
    let registry = registry_with(
      vec![(
        "transcript",
        HookDescriptor::new("https://example.com/t/{}")
          .with_key("segments")
          .with_timed(true),
      )],
      "transcript",
    );

    let result = runner(registry, source).run(&TaskRequest::new("1")).await.unwrap();
    let series = result.series().expect("series");
    assert_eq!(series[0].end, 1200.0);
    assert_eq!(series[2].start, 2000.0);
    assert_eq!(series[2].end, 3500.0);
  }

  /// Shape errors abort the task; nothing partial comes back.
  #[tokio::test]
  async fn test_missing_key_aborts() {
    let source = Arc::new(StubSource::new(r#"{"other":"x"}"#));
    let registry = registry_with(
      vec![("post", HookDescriptor::new("https://example.com/p/{}").with_key("missing"))],
      "post",
    );

    let err = runner(registry, source).run(&TaskRequest::new("1")).await.unwrap_err();
    assert!(matches!(err, HookError::MissingKey { .. }));
    assert_eq!(err.code(), -32003);
  }

  /// Real HTTP fetch against a local responder.
  #[tokio::test]
  async fn test_http_hook_end_to_end() {
    let server = serve_once("200 OK", r#"{"text": "Great work, thanks"}"#).await;
    let registry = registry_with(
      vec![(
        "comment",
        HookDescriptor::new(format!("{}/comments/%v", server.base_url))
          .with_key("text")
          .with_header("Authorization", "Bearer t0ken"),
      )],
      "comment",
    );
    let runner = runner(registry, Arc::new(HookFetcher::new()));

    let result = runner
      .run(&TaskRequest::new("55").with_hook("comment"))
      .await
      .unwrap();
    assert_eq!(result.document().score, 1);

    let request = server.request().await;
    assert!(request.starts_with("GET /comments/55 "), "request line: {}", request);
    assert!(request.to_ascii_lowercase().contains("authorization: bearer t0ken"));
  }
}
