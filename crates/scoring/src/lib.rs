pub mod lexicon;
pub mod model;

pub use lexicon::LexiconModel;
pub use model::{SentimentModel, default_model};
