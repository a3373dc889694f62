//! Per-class word index built from a labelled corpus.
//!
//! Each record is cleaned and its words are routed into the spam or ham bag
//! according to the corpus's [`LabelPair`]. Records whose label matches
//! neither side are counted and skipped. The index is never mutated after
//! [`ClassWordIndex::build`] returns.

use std::collections::{HashMap, HashSet};

use smsguard_core::{Class, LabelPair, LabeledRecord, ScoringMode};
use tracing::{debug, info};

use crate::tokenizer::Cleaner;

/// A record after cleaning, with its label resolved to a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedRecord {
    pub class: Class,
    pub tokens: Vec<String>,
}

impl CleanedRecord {
    /// Clean a raw record. `None` when its label is not part of `labels`.
    pub fn from_record(
        record: &LabeledRecord,
        cleaner: &Cleaner,
        labels: &LabelPair,
    ) -> Option<Self> {
        let class = labels.resolve(&record.label)?;
        Some(Self {
            class,
            tokens: cleaner.clean(&record.text),
        })
    }
}

/// Words seen for one class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WordBag {
    /// word → number of occurrences across the class's records
    Multiset(HashMap<String, usize>),
    /// distinct words of the class
    Set(HashSet<String>),
}

impl WordBag {
    pub fn new(mode: ScoringMode) -> Self {
        match mode {
            ScoringMode::Multiset => Self::Multiset(HashMap::new()),
            ScoringMode::Set => Self::Set(HashSet::new()),
        }
    }

    pub fn mode(&self) -> ScoringMode {
        match self {
            Self::Multiset(_) => ScoringMode::Multiset,
            Self::Set(_) => ScoringMode::Set,
        }
    }

    fn insert(&mut self, word: String) {
        match self {
            Self::Multiset(counts) => *counts.entry(word).or_default() += 1,
            Self::Set(words) => {
                words.insert(word);
            }
        }
    }

    /// Hits contributed by one occurrence of `word` in an input message:
    /// the word's corpus count in multiset mode, 0 or 1 in set mode.
    pub fn hits(&self, word: &str) -> usize {
        match self {
            Self::Multiset(counts) => counts.get(word).copied().unwrap_or(0),
            Self::Set(words) => usize::from(words.contains(word)),
        }
    }

    pub fn distinct_words(&self) -> usize {
        match self {
            Self::Multiset(counts) => counts.len(),
            Self::Set(words) => words.len(),
        }
    }

    /// Occurrences held by the bag (equal to `distinct_words` in set mode).
    pub fn total_words(&self) -> usize {
        match self {
            Self::Multiset(counts) => counts.values().sum(),
            Self::Set(words) => words.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.distinct_words() == 0
    }
}

/// Spam and ham word bags for one corpus.
#[derive(Debug, Clone)]
pub struct ClassWordIndex {
    spam: WordBag,
    ham: WordBag,
    records_indexed: usize,
    records_skipped: usize,
}

impl ClassWordIndex {
    /// Clean every record and bucket its words by label.
    pub fn build(
        records: &[LabeledRecord],
        cleaner: &Cleaner,
        labels: &LabelPair,
        mode: ScoringMode,
    ) -> Self {
        let mut index = Self {
            spam: WordBag::new(mode),
            ham: WordBag::new(mode),
            records_indexed: 0,
            records_skipped: 0,
        };

        for record in records {
            match CleanedRecord::from_record(record, cleaner, labels) {
                Some(cleaned) => index.add(cleaned),
                None => {
                    debug!(label = %record.label, "skipping record with unrecognised label");
                    index.records_skipped += 1;
                }
            }
        }

        info!(
            mode = ?mode,
            indexed = index.records_indexed,
            skipped = index.records_skipped,
            spam_words = index.spam.distinct_words(),
            ham_words = index.ham.distinct_words(),
            "built class word index"
        );
        index
    }

    fn add(&mut self, record: CleanedRecord) {
        let bag = match record.class {
            Class::Spam => &mut self.spam,
            Class::Ham => &mut self.ham,
        };
        for token in record.tokens {
            bag.insert(token);
        }
        self.records_indexed += 1;
    }

    pub fn bag(&self, class: Class) -> &WordBag {
        match class {
            Class::Spam => &self.spam,
            Class::Ham => &self.ham,
        }
    }

    pub fn mode(&self) -> ScoringMode {
        self.spam.mode()
    }

    pub fn records_indexed(&self) -> usize {
        self.records_indexed
    }

    pub fn records_skipped(&self) -> usize {
        self.records_skipped
    }

    /// True when neither class holds a single word.
    pub fn is_empty(&self) -> bool {
        self.spam.is_empty() && self.ham.is_empty()
    }
}
