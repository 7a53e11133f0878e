use serde::{Deserialize, Serialize};

/// Sentiment of a single word token. `score` is 1 for positive, 0 otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordScore {
  pub word: String,
  pub score: u8,
}

/// Result of scoring a text.
///
/// - `language`: language the model scored in
/// - `score`: overall polarity, 1 positive / 0 negative
/// - `words`: one entry per word token, in text order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
  pub language: String,
  pub score: u8,
  pub words: Vec<WordScore>,
}
