use crate::HookError;
use async_trait::async_trait;
use sentiment_core::HookDescriptor;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Body and metadata of a hook response
#[derive(Debug, Clone, Default)]
pub struct RawHookResponse {
  pub body: Vec<u8>,
  /// Declared `Content-Length`, when the server sent one
  pub content_length: Option<u64>,
  pub status: u16,
}

impl RawHookResponse {
  pub fn from_body(body: impl Into<Vec<u8>>) -> Self {
    Self {
      body: body.into(),
      content_length: None,
      status: 200,
    }
  }
}

/// Retrieves the raw content behind a hook for one record.
#[async_trait]
pub trait HookSource: Send + Sync {
  async fn fetch(&self, hook: &HookDescriptor, record_id: &str) -> Result<RawHookResponse, HookError>;
}

/// HTTP hook source: one GET per call, no retry, no caching.
#[derive(Debug, Clone)]
pub struct HookFetcher {
  client: reqwest::Client,
  timeout: Duration,
}

impl Default for HookFetcher {
  fn default() -> Self {
    Self::new()
  }
}

impl HookFetcher {
  pub fn new() -> Self {
    Self {
      client: reqwest::Client::new(),
      timeout: DEFAULT_FETCH_TIMEOUT,
    }
  }

  pub fn with_timeout(mut self, timeout: Duration) -> Self {
    self.timeout = timeout;
    self
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  /// Substitute the record id into the hook's url template and parse the result.
  pub fn build_url(hook: &HookDescriptor, record_id: &str) -> Result<reqwest::Url, HookError> {
    let rendered = hook.render_url(record_id);
    let url = reqwest::Url::parse(&rendered).map_err(|e| HookError::UrlFormat {
      url: rendered.clone(),
      reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
      return Err(HookError::UrlFormat {
        url: rendered,
        reason: format!("unsupported scheme '{}'", url.scheme()),
      });
    }

    Ok(url)
  }
}

#[async_trait]
impl HookSource for HookFetcher {
  async fn fetch(&self, hook: &HookDescriptor, record_id: &str) -> Result<RawHookResponse, HookError> {
    let url = Self::build_url(hook, record_id)?;
    debug!("Fetching hook url {}", url);

    let mut request = self.client.get(url.clone()).timeout(self.timeout);
    for (name, values) in &hook.headers {
      for value in values {
        request = request.header(name.as_str(), value.as_str());
      }
    }

    let response = request.send().await.map_err(|source| HookError::Transport {
      url: url.to_string(),
      source,
    })?;

    let status = response.status();
    if !status.is_success() {
      warn!("Hook {} answered {}", url, status);
    }
    let content_length = response.content_length();

    let body = response.bytes().await.map_err(|source| HookError::BodyRead {
      url: url.to_string(),
      source,
    })?;

    debug!("Hook {} returned {} bytes", url, body.len());

    Ok(RawHookResponse {
      body: body.to_vec(),
      content_length,
      status: status.as_u16(),
    })
  }
}
