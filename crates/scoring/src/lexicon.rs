//! Word-list sentiment model.
//!
//! Each token is looked up in weighted positive/negative pattern sets. A negator within the
//! previous two tokens flips the polarity of the next sentiment-bearing word. The overall score
//! is positive when the summed polarity is above zero.

use crate::SentimentModel;
use sentiment_core::{Analysis, WordScore};
use std::collections::HashMap;
use tracing::trace;

const LANGUAGE: &str = "en";

/// How many tokens a negator reaches forward
const NEGATION_WINDOW: usize = 2;

/// Pattern definitions for one polarity
struct PatternSet {
  words: &'static [&'static str],
  weight: f32,
}

fn positive_patterns() -> PatternSet {
  PatternSet {
    words: &[
      "good",
      "great",
      "happy",
      "glad",
      "joy",
      "love",
      "loved",
      "like",
      "liked",
      "nice",
      "excellent",
      "amazing",
      "awesome",
      "wonderful",
      "fantastic",
      "best",
      "better",
      "beautiful",
      "brilliant",
      "enjoy",
      "enjoyed",
      "fun",
      "pleased",
      "positive",
      "perfect",
      "superb",
      "success",
      "successful",
      "thanks",
      "thank",
      "helpful",
      "easy",
      "easier",
      "win",
      "recommend",
      "favorite",
      "delightful",
      "impressive",
      "truth",
      "well",
    ],
    weight: 1.0,
  }
}

fn negative_patterns() -> PatternSet {
  PatternSet {
    words: &[
      "bad",
      "sad",
      "unhappy",
      "angry",
      "hate",
      "hated",
      "dislike",
      "awful",
      "terrible",
      "horrible",
      "worst",
      "worse",
      "poor",
      "boring",
      "annoying",
      "ugly",
      "fail",
      "failed",
      "failure",
      "wrong",
      "broken",
      "problem",
      "pain",
      "painful",
      "disappointed",
      "disappointing",
      "negative",
      "useless",
      "waste",
      "trouble",
      "difficult",
      "hard",
      "lose",
      "lost",
      "sorry",
    ],
    weight: 1.0,
  }
}

const NEGATORS: &[&str] = &["not", "no", "never", "nothing", "nobody", "neither", "nor", "hardly", "without"];

fn is_negator(token: &str) -> bool {
  NEGATORS.contains(&token) || token.ends_with("n't")
}

/// Split text into lowercase word tokens, keeping inner apostrophes.
fn tokenize(text: &str) -> Vec<String> {
  text
    .split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '’'))
    .map(|t| t.trim_matches(|c| c == '\'' || c == '’'))
    .filter(|t| !t.is_empty())
    .map(|t| t.replace('’', "'").to_lowercase())
    .collect()
}

/// Lexicon-backed [`SentimentModel`]
pub struct LexiconModel {
  polarity: HashMap<&'static str, f32>,
}

impl Default for LexiconModel {
  fn default() -> Self {
    Self::new()
  }
}

impl LexiconModel {
  pub fn new() -> Self {
    let mut polarity = HashMap::new();
    let positive = positive_patterns();
    for word in positive.words {
      polarity.insert(*word, positive.weight);
    }
    let negative = negative_patterns();
    for word in negative.words {
      polarity.insert(*word, -negative.weight);
    }
    Self { polarity }
  }

  fn polarity_of(&self, token: &str) -> f32 {
    self.polarity.get(token).copied().unwrap_or(0.0)
  }
}

impl SentimentModel for LexiconModel {
  fn name(&self) -> &str {
    "lexicon"
  }

  fn analyse(&self, text: &str) -> Analysis {
    let tokens = tokenize(text);
    let mut words = Vec::with_capacity(tokens.len());
    let mut total = 0.0f32;
    let mut negated_for = 0usize;

    for token in tokens {
      let mut polarity = self.polarity_of(&token);

      if polarity != 0.0 && negated_for > 0 {
        polarity = -polarity;
        negated_for = 0;
      } else if is_negator(&token) {
        negated_for = NEGATION_WINDOW + 1;
      }
      negated_for = negated_for.saturating_sub(1);

      total += polarity;
      words.push(WordScore {
        score: u8::from(polarity > 0.0),
        word: token,
      });
    }

    trace!("Lexicon polarity {} over {} words", total, words.len());

    Analysis {
      language: LANGUAGE.to_string(),
      score: u8::from(total > 0.0),
      words,
    }
  }
}
