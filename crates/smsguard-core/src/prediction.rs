//! Prediction results and the knobs that shape them.

use serde::{Deserialize, Serialize};

/// Label reported when neither class wins.
pub const UNKNOWN: &str = "unknown";

/// How word hits are counted for a corpus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    /// Every occurrence of a word in the corpus contributes to its weight.
    #[default]
    Multiset,
    /// A word either belongs to a class or it doesn't.
    Set,
}

/// Range a confidence value is reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// 0.0 to 1.0
    Ratio,
    /// 0.0 to 100.0
    #[default]
    Percent,
}

impl Scale {
    /// Upper bound of the scale.
    pub fn max(self) -> f64 {
        match self {
            Self::Ratio => 1.0,
            Self::Percent => 100.0,
        }
    }

    /// Express a `[0, 1]` share on this scale, rounded to 2 decimals.
    pub fn express(self, share: f64) -> f64 {
        round2(share.clamp(0.0, 1.0) * self.max())
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Outcome of classifying one message.
///
/// `confidence` is the winning class's share of all word hits, not a measured
/// accuracy. It keeps the `accuracy` name on the wire for existing clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub prediction: String,
    #[serde(rename = "accuracy")]
    pub confidence: f64,
}

impl PredictionResult {
    pub fn new(prediction: impl Into<String>, confidence: f64) -> Self {
        Self {
            prediction: prediction.into(),
            confidence,
        }
    }

    pub fn unknown() -> Self {
        Self::new(UNKNOWN, 0.0)
    }

    pub fn is_unknown(&self) -> bool {
        self.prediction == UNKNOWN
    }
}

/// Shape of one served corpus, as reported by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub name: String,
    pub mode: ScoringMode,
    pub scale: Scale,
    pub spam_label: String,
    pub ham_label: String,
    pub records_indexed: usize,
    pub records_skipped: usize,
    pub spam_words: usize,
    pub ham_words: usize,
}
