//! Word-overlap scoring against a frozen [`ClassWordIndex`].
//!
//! Each input token adds its hits in the spam bag to the spam score and its
//! hits in the ham bag to the ham score. The higher score wins and its share
//! of the total becomes the confidence. Equal scores, zero included, give
//! `unknown`. There is no smoothing, so a message sharing no words with
//! either class is always `unknown`.

use smsguard_core::{Class, LabelPair, PredictionResult, Scale};
use tracing::debug;

use crate::index::ClassWordIndex;

/// Raw hit counts for one message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scores {
    pub spam: usize,
    pub ham: usize,
}

impl Scores {
    pub fn total(&self) -> usize {
        self.spam + self.ham
    }

    /// The winning class and its share of all hits, or `None` on a tie.
    pub fn winner(&self) -> Option<(Class, f64)> {
        let total = self.total() as f64;
        if self.spam > self.ham {
            Some((Class::Spam, self.spam as f64 / total))
        } else if self.ham > self.spam {
            Some((Class::Ham, self.ham as f64 / total))
        } else {
            None
        }
    }
}

/// Sum per-class hits over `tokens`.
pub fn score(tokens: &[String], index: &ClassWordIndex) -> Scores {
    let spam = index.bag(Class::Spam);
    let ham = index.bag(Class::Ham);
    tokens.iter().fold(Scores::default(), |acc, token| Scores {
        spam: acc.spam + spam.hits(token),
        ham: acc.ham + ham.hits(token),
    })
}

/// Classify already-cleaned tokens.
pub fn predict(
    tokens: &[String],
    index: &ClassWordIndex,
    labels: &LabelPair,
    scale: Scale,
) -> PredictionResult {
    if tokens.is_empty() {
        return PredictionResult::unknown();
    }

    let scores = score(tokens, index);
    debug!(
        tokens = tokens.len(),
        spam = scores.spam,
        ham = scores.ham,
        "scored message"
    );

    match scores.winner() {
        Some((class, share)) => PredictionResult::new(labels.name(class), scale.express(share)),
        None => PredictionResult::unknown(),
    }
}
