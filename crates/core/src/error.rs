use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
  #[error("IO: {0}")]
  Io(#[from] std::io::Error),

  #[error("Config parse: {0}")]
  Parse(String),

  #[error("Config fetch from {url}: {reason}")]
  Fetch { url: String, reason: String },

  #[error("Invalid config: {0}")]
  InvalidConfig(String),
}

impl From<toml::de::Error> for Error {
  fn from(e: toml::de::Error) -> Self {
    Self::Parse(e.to_string())
  }
}

impl From<serde_json::Error> for Error {
  fn from(e: serde_json::Error) -> Self {
    Self::Parse(e.to_string())
  }
}

pub type Result<T> = std::result::Result<T, Error>;
