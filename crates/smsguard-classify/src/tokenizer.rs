//! Text cleaning: lowercase, split into words, drop punctuation and stopwords.
//!
//! Two policies are supported. [`CleanPolicy::Tokenize`] walks Unicode word
//! boundaries and discards tokens with no alphanumeric character, so
//! `"call now!!"` becomes `["call", "now"]` and contractions such as `"don't"`
//! stay whole. [`CleanPolicy::Strip`] deletes every non-word, non-space
//! character first (`"don't"` becomes `"dont"`) and then splits on
//! whitespace. Neither stems. Duplicates and order are kept.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use smsguard_core::{CleanPolicy, StopwordConfig, StopwordSet};
use unicode_segmentation::UnicodeSegmentation;

/// The standard English stopword list (179 words).
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());

/// Clean `text` with the default tokenizing policy and the given stopwords.
pub fn clean(text: &str, stopwords: &HashSet<String>) -> Vec<String> {
    tokenize(&text.to_lowercase(), stopwords)
}

/// A configured cleaning policy plus its stopword set.
#[derive(Debug, Clone)]
pub struct Cleaner {
    policy: CleanPolicy,
    stopwords: HashSet<String>,
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::english()
    }
}

impl Cleaner {
    pub fn new<I, S>(policy: CleanPolicy, stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            policy,
            stopwords: stopwords
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Tokenizing policy with English stopwords.
    pub fn english() -> Self {
        Self::new(CleanPolicy::Tokenize, ENGLISH_STOPWORDS)
    }

    /// No stopword removal.
    pub fn raw(policy: CleanPolicy) -> Self {
        Self::new(policy, std::iter::empty::<&str>())
    }

    pub fn from_config(policy: CleanPolicy, stopwords: &StopwordConfig) -> Self {
        match stopwords {
            StopwordConfig::Named(StopwordSet::English) => Self::new(policy, ENGLISH_STOPWORDS),
            StopwordConfig::Named(StopwordSet::None) => Self::raw(policy),
            StopwordConfig::Words(words) => Self::new(policy, words),
        }
    }

    pub fn policy(&self) -> CleanPolicy {
        self.policy
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    pub fn clean(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        match self.policy {
            CleanPolicy::Tokenize => tokenize(&lower, &self.stopwords),
            CleanPolicy::Strip => strip(&lower, &self.stopwords),
        }
    }
}

fn tokenize(lower: &str, stopwords: &HashSet<String>) -> Vec<String> {
    lower
        .split_word_bounds()
        .filter(|tok| tok.chars().any(char::is_alphanumeric))
        .filter(|tok| !stopwords.contains(*tok))
        .map(str::to_string)
        .collect()
}

fn strip(lower: &str, stopwords: &HashSet<String>) -> Vec<String> {
    NON_WORD
        .replace_all(lower, "")
        .split_whitespace()
        .filter(|tok| !stopwords.contains(*tok))
        .map(str::to_string)
        .collect()
}
