//! Service configuration: listen address, fetch timeout and the hook table.
//!
//! Config source priority: explicit path/url > SENTIMENTD_CONFIG > ./config.toml > user config
//! (~/.config/sentimentd/config.toml). Sources may be local files or http(s) urls; a `.json`
//! suffix selects JSON, anything else is read as TOML.

use crate::hook::HookDescriptor;
use crate::{Error, Result};
use reqwest::header::{HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Env var naming the config source when no explicit one is given
pub const CONFIG_ENV: &str = "SENTIMENTD_CONFIG";

/// On-disk representation of a config source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
  Toml,
  Json,
}

impl ConfigFormat {
  /// Pick the format from a path or url suffix.
  pub fn from_source(source: &str) -> Self {
    let path = match reqwest::Url::parse(source) {
      Ok(url) if is_remote(&url) => url.path().to_string(),
      _ => source.to_string(),
    };

    if path.to_ascii_lowercase().ends_with(".json") {
      ConfigFormat::Json
    } else {
      ConfigFormat::Toml
    }
  }
}

fn is_remote(url: &reqwest::Url) -> bool {
  matches!(url.scheme(), "http" | "https")
}

/// Whether a config source refers to an http(s) url rather than a file
pub fn is_url_source(source: &str) -> bool {
  reqwest::Url::parse(source).map(|u| is_remote(&u)).unwrap_or(false)
}

/// Service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  /// Address the daemon binds to (default: 127.0.0.1)
  pub host: String,

  /// Port the daemon listens on (default: 8080, 0 is treated as unset)
  pub port: u16,

  /// Upper bound on a single hook fetch in seconds (default: 30)
  pub fetch_timeout_secs: u64,

  /// Hook used when a task names none
  #[serde(alias = "defaultHook")]
  pub default_hook: String,

  /// Hook id to descriptor
  pub hooks: BTreeMap<String, HookDescriptor>,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      host: DEFAULT_HOST.to_string(),
      port: DEFAULT_PORT,
      fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
      default_hook: String::new(),
      hooks: BTreeMap::new(),
    }
  }
}

impl Config {
  /// Parse, normalise and validate config text.
  pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
    let mut config: Config = match format {
      ConfigFormat::Toml => toml::from_str(content)?,
      ConfigFormat::Json => serde_json::from_str(content)?,
    };
    config.normalise();
    config.validate()?;
    Ok(config)
  }

  /// Load from a local file.
  pub fn load_path(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    Self::parse(&content, ConfigFormat::from_source(&path.to_string_lossy()))
  }

  /// Load from a file path or an http(s) url.
  pub async fn load(source: &str) -> Result<Self> {
    if !is_url_source(source) {
      return Self::load_path(Path::new(source));
    }

    debug!("Fetching config from {}", source);
    let fetch_err = |e: reqwest::Error| Error::Fetch {
      url: source.to_string(),
      reason: e.to_string(),
    };

    let response = reqwest::get(source).await.map_err(fetch_err)?;
    if !response.status().is_success() {
      return Err(Error::Fetch {
        url: source.to_string(),
        reason: format!("status {}", response.status()),
      });
    }
    let content = response.text().await.map_err(fetch_err)?;

    Self::parse(&content, ConfigFormat::from_source(source))
  }

  /// Load from the resolved source, or defaults when none exists.
  pub async fn load_or_default(explicit: Option<&str>) -> Result<Self> {
    match Self::resolve_source(explicit) {
      Some(source) => Self::load(&source).await,
      None => {
        debug!("No config source found, using defaults");
        Ok(Self::default())
      }
    }
  }

  /// Find the config source to use, if any.
  pub fn resolve_source(explicit: Option<&str>) -> Option<String> {
    if let Some(source) = explicit.filter(|s| !s.is_empty()) {
      return Some(source.to_string());
    }

    if let Ok(source) = std::env::var(CONFIG_ENV)
      && !source.is_empty()
    {
      return Some(source);
    }

    let local = PathBuf::from("config.toml");
    if local.exists() {
      return Some(local.to_string_lossy().to_string());
    }

    Self::user_config_path()
      .filter(|p| p.exists())
      .map(|p| p.to_string_lossy().to_string())
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    if let Ok(path) = std::env::var("XDG_CONFIG_HOME") {
      return Some(PathBuf::from(path).join("sentimentd").join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("sentimentd").join("config.toml"))
  }

  /// Fill in derived defaults.
  ///
  /// A single configured hook becomes the default when none is named.
  pub fn normalise(&mut self) {
    if self.port == 0 {
      self.port = DEFAULT_PORT;
    }
    if self.host.is_empty() {
      self.host = DEFAULT_HOST.to_string();
    }

    if self.default_hook.is_empty()
      && self.hooks.len() == 1
      && let Some(id) = self.hooks.keys().next()
    {
      debug!("Using only configured hook '{}' as default", id);
      self.default_hook = id.clone();
    }
  }

  /// Check the invariants every consumer relies on.
  pub fn validate(&self) -> Result<()> {
    if self.fetch_timeout_secs == 0 {
      return Err(Error::InvalidConfig("fetch_timeout_secs must be greater than 0".to_string()));
    }

    if self.default_hook.is_empty() && self.hooks.len() > 1 {
      let ids: Vec<&str> = self.hooks.keys().map(String::as_str).collect();
      return Err(Error::InvalidConfig(format!(
        "default_hook must be set when more than one hook is configured (hooks: {})",
        ids.join(", ")
      )));
    }

    if !self.default_hook.is_empty() && !self.hooks.contains_key(&self.default_hook) {
      return Err(Error::InvalidConfig(format!(
        "default_hook '{}' is not a configured hook",
        self.default_hook
      )));
    }

    for (id, hook) in &self.hooks {
      validate_hook(id, hook)?;
    }

    Ok(())
  }

  pub fn socket_addr(&self) -> String {
    format!("{}:{}", self.host, self.port)
  }

  pub fn fetch_timeout(&self) -> Duration {
    Duration::from_secs(self.fetch_timeout_secs)
  }

  /// Generate a default config file as a string
  pub fn generate_template() -> String {
    format!(
      r#"# sentimentd configuration
# Place in ./config.toml, ~/.config/sentimentd/config.toml, or pass --config <path|url>

# Listen address
host = "{host}"
port = {port}

# Upper bound on a single hook fetch (seconds)
fetch_timeout_secs = {timeout}

# Hook used when a task omits hookId.
# Required when more than one hook is configured.
default_hook = "comment"

# ============================================================================
# Hooks
# ============================================================================
# url     - template with exactly one slot ({{}}, %s or %v) for the recording id
# key     - JSON field holding the text; omit to use the raw body
# timed   - body holds [{{start, end, text}}] segments
# headers - header name to list of values, sent on every fetch

[hooks.comment]
url = "https://example.com/comments/{{}}"
key = "body"

# [hooks.comment.headers]
# Authorization = ["Bearer <token>"]

# [hooks.transcript]
# url = "https://example.com/recordings/{{}}/transcript"
# key = "segments"
# timed = true
"#,
      host = DEFAULT_HOST,
      port = DEFAULT_PORT,
      timeout = DEFAULT_FETCH_TIMEOUT_SECS,
    )
  }
}

fn validate_hook(id: &str, hook: &HookDescriptor) -> Result<()> {
  let slots = hook.slot_count();
  if slots != 1 {
    return Err(Error::InvalidConfig(format!(
      "hook '{}': url must contain exactly one slot, found {}",
      id, slots
    )));
  }

  let probe = hook.render_url("0");
  match reqwest::Url::parse(&probe) {
    Ok(url) if is_remote(&url) => {}
    Ok(url) => {
      return Err(Error::InvalidConfig(format!(
        "hook '{}': unsupported url scheme '{}'",
        id,
        url.scheme()
      )));
    }
    Err(e) => {
      return Err(Error::InvalidConfig(format!("hook '{}': invalid url '{}': {}", id, hook.url, e)));
    }
  }

  for (name, values) in &hook.headers {
    if HeaderName::from_bytes(name.as_bytes()).is_err() {
      return Err(Error::InvalidConfig(format!("hook '{}': invalid header name '{}'", id, name)));
    }
    if let Some(bad) = values.iter().find(|v| HeaderValue::from_str(v).is_err()) {
      return Err(Error::InvalidConfig(format!(
        "hook '{}': invalid value for header '{}': {:?}",
        id, name, bad
      )));
    }
  }

  Ok(())
}
