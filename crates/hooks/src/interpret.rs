//! Decoding hook responses into text or time-stamped segments.
//!
//! The shape is declared by the hook, not sniffed from the body:
//!
//! | key     | timed | body                                            |
//! |---------|-------|-------------------------------------------------|
//! | absent  | false | raw text, used verbatim                         |
//! | present | false | JSON object, `key` holds a string               |
//! | present | true  | JSON object, `key` holds `[{start, end, text}]` |
//! | absent  | true  | top-level `[{start, end, text}]`                |
//!
//! Keyed series timestamps are multiplied by [`KEYED_SERIES_SCALE`] on the way in; bare
//! series are taken as-is. Existing consumers depend on this asymmetry.

use crate::{HookError, RawHookResponse, reduce};
use sentiment_core::{HookDescriptor, Segment};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Factor applied to `start`/`end` of segments nested under a key
pub const KEYED_SERIES_SCALE: f64 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
  RawText,
  KeyedText,
  KeyedSeries,
  BareSeries,
}

impl ResponseShape {
  pub fn of(hook: &HookDescriptor) -> Self {
    match (hook.key().is_some(), hook.timed) {
      (false, false) => Self::RawText,
      (true, false) => Self::KeyedText,
      (true, true) => Self::KeyedSeries,
      (false, true) => Self::BareSeries,
    }
  }
}

/// Text ready for scoring, plus the segments it was built from for timed hooks
#[derive(Debug, Clone, PartialEq)]
pub struct Interpretation {
  pub segments: Option<Vec<Segment>>,
  pub text: String,
}

impl Interpretation {
  fn text(text: String) -> Self {
    Self { segments: None, text }
  }

  fn series(segments: Vec<Segment>) -> Self {
    let text = reduce(&segments);
    Self {
      segments: Some(segments),
      text,
    }
  }
}

#[derive(Debug, Deserialize)]
struct TimedEntry {
  start: f64,
  end: f64,
  text: String,
}

impl TimedEntry {
  fn into_segment(self, scale: f64) -> Segment {
    Segment::new(self.start * scale, self.end * scale, self.text)
  }
}

/// Decode `raw` according to the shape `hook` declares.
pub fn interpret(hook_id: &str, hook: &HookDescriptor, raw: &RawHookResponse) -> Result<Interpretation, HookError> {
  let shape = ResponseShape::of(hook);
  debug!("Interpreting {} bytes from hook '{}' as {:?}", raw.body.len(), hook_id, shape);

  match (shape, hook.key()) {
    (ResponseShape::KeyedText, Some(key)) => match lookup(hook_id, key, &raw.body)? {
      Value::String(text) => Ok(Interpretation::text(text)),
      other => Err(type_mismatch(hook_id, key, "string", &other)),
    },
    (ResponseShape::KeyedSeries, Some(key)) => {
      let value = lookup(hook_id, key, &raw.body)?;
      if !value.is_array() {
        return Err(type_mismatch(hook_id, key, "array", &value));
      }
      let entries: Vec<TimedEntry> =
        serde_json::from_value(value).map_err(|e| HookError::malformed(hook_id, &raw.body, e))?;
      Ok(Interpretation::series(to_segments(entries, KEYED_SERIES_SCALE)))
    }
    (ResponseShape::BareSeries, _) => {
      let entries: Vec<TimedEntry> =
        serde_json::from_slice(&raw.body).map_err(|e| HookError::malformed(hook_id, &raw.body, e))?;
      Ok(Interpretation::series(to_segments(entries, 1.0)))
    }
    _ => Ok(Interpretation::text(raw_text(hook_id, &raw.body))),
  }
}

fn to_segments(entries: Vec<TimedEntry>, scale: f64) -> Vec<Segment> {
  entries.into_iter().map(|e| e.into_segment(scale)).collect()
}

/// Parse the body as a JSON object and take `key` out of it.
fn lookup(hook_id: &str, key: &str, body: &[u8]) -> Result<Value, HookError> {
  let mut object: Map<String, Value> =
    serde_json::from_slice(body).map_err(|e| HookError::malformed(hook_id, body, e))?;

  object.remove(key).ok_or_else(|| HookError::MissingKey {
    hook: hook_id.to_string(),
    key: key.to_string(),
  })
}

fn raw_text(hook_id: &str, body: &[u8]) -> String {
  match String::from_utf8(body.to_vec()) {
    Ok(text) => text,
    Err(_) => {
      warn!("Hook '{}' returned non-UTF-8 text, replacing invalid bytes", hook_id);
      String::from_utf8_lossy(body).into_owned()
    }
  }
}

fn type_mismatch(hook_id: &str, key: &str, expected: &'static str, found: &Value) -> HookError {
  HookError::TypeMismatch {
    hook: hook_id.to_string(),
    key: key.to_string(),
    expected,
    found: json_kind(found),
  }
}

fn json_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
