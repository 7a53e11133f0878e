//! Failure kinds for a hook task. None of them are retried; each aborts the task.

use thiserror::Error;

/// Longest body prefix kept for diagnostics, in bytes
const EXCERPT_LIMIT: usize = 256;

#[derive(Error, Debug)]
pub enum HookError {
  #[error("Hook not found: {}", display_hook_id(.0))]
  HookNotFound(String),

  #[error("Invalid hook url '{url}': {reason}")]
  UrlFormat { url: String, reason: String },

  #[error("Hook request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Failed to read hook response from {url}: {source}")]
  BodyRead {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Malformed response from hook '{hook}': {reason} (body: {excerpt:?})")]
  MalformedBody {
    hook: String,
    reason: String,
    excerpt: String,
  },

  #[error("Response from hook '{hook}' has no key '{key}'")]
  MissingKey { hook: String, key: String },

  #[error("Key '{key}' from hook '{hook}' is {found}, expected {expected}")]
  TypeMismatch {
    hook: String,
    key: String,
    expected: &'static str,
    found: &'static str,
  },
}

impl HookError {
  /// JSON-RPC style error code for this failure.
  ///
  /// - `-32004`: hook id unknown
  /// - `-32002`: the fetch itself failed
  /// - `-32003`: the body did not match the hook's declared shape
  pub fn code(&self) -> i32 {
    match self {
      Self::HookNotFound(_) => -32004,
      Self::UrlFormat { .. } | Self::Transport { .. } | Self::BodyRead { .. } => -32002,
      Self::MalformedBody { .. } | Self::MissingKey { .. } | Self::TypeMismatch { .. } => -32003,
    }
  }

  pub fn malformed(hook: &str, body: &[u8], reason: impl ToString) -> Self {
    Self::MalformedBody {
      hook: hook.to_string(),
      reason: reason.to_string(),
      excerpt: excerpt(body),
    }
  }
}

fn display_hook_id(id: &str) -> &str {
  if id.is_empty() { "no default hook configured" } else { id }
}

/// Lossy, length-capped rendering of a response body.
pub fn excerpt(body: &[u8]) -> String {
  let text = String::from_utf8_lossy(body);
  if text.len() <= EXCERPT_LIMIT {
    return text.into_owned();
  }

  let mut end = EXCERPT_LIMIT;
  while !text.is_char_boundary(end) {
    end -= 1;
  }
  format!("{}...", &text[..end])
}
