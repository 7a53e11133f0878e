//! Hook descriptors: where to fetch a record's text from and how to read it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tokens recognised as the record-id slot in a hook url.
///
/// `{}` is the native form; `%s` and `%v` keep printf-style urls working.
pub const SLOT_TOKENS: &[&str] = &["{}", "%s", "%v"];

/// A configured external endpoint that supplies text for a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookDescriptor {
  /// Url template with exactly one slot for the record id
  #[serde(alias = "urlTemplate")]
  pub url: String,

  /// Header name to ordered values, replayed verbatim on every fetch
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub headers: BTreeMap<String, Vec<String>>,

  /// JSON field holding the text (or the segment array when `timed`)
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub key: Option<String>,

  /// Response carries time-stamped segments instead of one text block
  #[serde(default)]
  pub timed: bool,
}

impl HookDescriptor {
  pub fn new(url: impl Into<String>) -> Self {
    Self {
      url: url.into(),
      headers: BTreeMap::new(),
      key: None,
      timed: false,
    }
  }

  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = Some(key.into());
    self
  }

  pub fn with_timed(mut self, timed: bool) -> Self {
    self.timed = timed;
    self
  }

  pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
    self.headers.entry(name.into()).or_default().push(value.into());
    self
  }

  /// The lookup key, treating an empty string as absent.
  pub fn key(&self) -> Option<&str> {
    self.key.as_deref().filter(|k| !k.is_empty())
  }

  /// Number of slot tokens in the url template.
  pub fn slot_count(&self) -> usize {
    SLOT_TOKENS.iter().map(|t| self.url.matches(t).count()).sum()
  }

  /// Substitute `record_id` into the first slot of the url template.
  ///
  /// The id is inserted verbatim. A template without a slot is returned
  /// unchanged.
  pub fn render_url(&self, record_id: &str) -> String {
    let first = SLOT_TOKENS
      .iter()
      .filter_map(|t| self.url.find(t).map(|pos| (pos, t.len())))
      .min_by_key(|(pos, _)| *pos);

    match first {
      Some((pos, len)) => {
        let mut url = String::with_capacity(self.url.len() + record_id.len());
        url.push_str(&self.url[..pos]);
        url.push_str(record_id);
        url.push_str(&self.url[pos + len..]);
        url
      }
      None => self.url.clone(),
    }
  }
}
