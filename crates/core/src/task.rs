//! Request and result shapes for scoring tasks.

use crate::Analysis;
use serde::{Deserialize, Serialize};

/// Body of an `analyze` call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyseRequest {
  #[serde(default)]
  pub text: String,
}

/// Body of a `task` call: which record to fetch, and optionally through which hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRequest {
  #[serde(rename = "recordingId")]
  pub record_id: String,
  #[serde(rename = "hookId", default, skip_serializing_if = "Option::is_none")]
  pub hook_id: Option<String>,
}

impl TaskRequest {
  pub fn new(record_id: impl Into<String>) -> Self {
    Self {
      record_id: record_id.into(),
      hook_id: None,
    }
  }

  pub fn with_hook(mut self, hook_id: impl Into<String>) -> Self {
    self.hook_id = Some(hook_id.into());
    self
  }
}

/// One time-stamped unit of text from a timed hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
  pub start: f64,
  pub end: f64,
  pub text: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub score: Option<u8>,
}

impl Segment {
  pub fn new(start: f64, end: f64, text: impl Into<String>) -> Self {
    Self {
      start,
      end,
      text: text.into(),
      score: None,
    }
  }
}

/// Output of a task: the whole-document analysis, plus the scored series
/// when the hook produced segments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskResult {
  Series { metadata: Analysis, series: Vec<Segment> },
  Document(Analysis),
}

impl TaskResult {
  /// The whole-document analysis regardless of shape.
  pub fn document(&self) -> &Analysis {
    match self {
      Self::Series { metadata, .. } => metadata,
      Self::Document(analysis) => analysis,
    }
  }

  pub fn series(&self) -> Option<&[Segment]> {
    match self {
      Self::Series { series, .. } => Some(series),
      Self::Document(_) => None,
    }
  }
}
