use crate::HookError;
use sentiment_core::{Config, HookDescriptor};
use std::collections::BTreeMap;

/// A hook picked for a task, with the id it was registered under
#[derive(Debug, Clone, Copy)]
pub struct ResolvedHook<'a> {
  pub id: &'a str,
  pub descriptor: &'a HookDescriptor,
}

/// Named hook descriptors plus the default id. Immutable once built, so it is
/// shared across requests behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
  hooks: BTreeMap<String, HookDescriptor>,
  default_hook: String,
}

impl HookRegistry {
  pub fn new(hooks: BTreeMap<String, HookDescriptor>, default_hook: impl Into<String>) -> Self {
    Self {
      hooks,
      default_hook: default_hook.into(),
    }
  }

  /// Build from an already normalised and validated config.
  pub fn from_config(config: &Config) -> Self {
    Self::new(config.hooks.clone(), config.default_hook.clone())
  }

  /// Look up `requested`, or the default hook when it is absent or empty.
  pub fn resolve(&self, requested: Option<&str>) -> Result<ResolvedHook<'_>, HookError> {
    let id = match requested.filter(|id| !id.is_empty()) {
      Some(id) => id,
      None => self.default_hook.as_str(),
    };

    self
      .hooks
      .get_key_value(id)
      .map(|(id, descriptor)| ResolvedHook { id, descriptor })
      .ok_or_else(|| HookError::HookNotFound(id.to_string()))
  }

  pub fn default_hook(&self) -> Option<&str> {
    Some(self.default_hook.as_str()).filter(|id| !id.is_empty())
  }

  pub fn ids(&self) -> impl Iterator<Item = &str> {
    self.hooks.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &HookDescriptor)> {
    self.hooks.iter().map(|(id, hook)| (id.as_str(), hook))
  }

  pub fn len(&self) -> usize {
    self.hooks.len()
  }

  pub fn is_empty(&self) -> bool {
    self.hooks.is_empty()
  }
}
