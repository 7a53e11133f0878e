use crate::LexiconModel;
use sentiment_core::Analysis;
use std::sync::Arc;

/// Scores text for sentiment.
///
/// Implementations must be pure: the same text always yields the same analysis.
pub trait SentimentModel: Send + Sync {
  fn name(&self) -> &str;

  fn analyse(&self, text: &str) -> Analysis;

  /// Overall polarity only.
  fn score(&self, text: &str) -> u8 {
    self.analyse(text).score
  }
}

/// The built-in model used when nothing else is configured
pub fn default_model() -> Arc<dyn SentimentModel> {
  Arc::new(LexiconModel::new())
}
