//! Labelled dataset records and the label pair that gives them meaning.
//!
//! Dataset sources hand out raw `(label, text)` rows. Whether a row counts as
//! spam, ham, or noise is decided later by the corpus's [`LabelPair`], so the
//! same reader works for a `spam`/`ham` file and a `scam`/`ham` table.

use serde::{Deserialize, Serialize};

/// One side of a binary spam/ham split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Class {
    Spam,
    Ham,
}

/// The two label strings a corpus recognises, e.g. `spam`/`ham` or `scam`/`ham`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelPair {
    pub spam: String,
    pub ham: String,
}

impl Default for LabelPair {
    fn default() -> Self {
        Self::new("spam", "ham")
    }
}

impl LabelPair {
    pub fn new(spam: impl Into<String>, ham: impl Into<String>) -> Self {
        Self {
            spam: spam.into(),
            ham: ham.into(),
        }
    }

    /// Trim surrounding whitespace from both labels.
    pub fn normalize(&mut self) {
        self.spam = self.spam.trim().to_string();
        self.ham = self.ham.trim().to_string();
    }

    /// Map a raw label onto a class. Matching ignores case and surrounding
    /// whitespace; anything else yields `None`.
    pub fn resolve(&self, label: &str) -> Option<Class> {
        let label = label.trim();
        if label.eq_ignore_ascii_case(self.spam.trim()) {
            Some(Class::Spam)
        } else if label.eq_ignore_ascii_case(self.ham.trim()) {
            Some(Class::Ham)
        } else {
            None
        }
    }

    /// The label string reported for a class.
    pub fn name(&self, class: Class) -> &str {
        match class {
            Class::Spam => &self.spam,
            Class::Ham => &self.ham,
        }
    }
}

/// A raw labelled message as read from a dataset file or the message table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledRecord {
    pub label: String,
    pub text: String,
}

impl LabeledRecord {
    pub fn new(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            text: text.into(),
        }
    }
}
