//! Classification layer: text cleaning, per-class word indices, and word-overlap scoring.

pub mod classifier;
pub mod corpus;
pub mod index;
pub mod tokenizer;

pub use classifier::{Scores, predict, score};
pub use corpus::{ClassifyError, CorpusClassifier, CorpusSet};
pub use index::{ClassWordIndex, CleanedRecord, WordBag};
pub use tokenizer::{Cleaner, ENGLISH_STOPWORDS, clean};
