//! One classification pipeline per configured corpus.
//!
//! A [`CorpusClassifier`] bundles the cleaner, the frozen index, the label
//! pair, and the confidence scale of a single corpus. A [`CorpusSet`] holds
//! every corpus the process serves, keyed by name. Both are immutable once
//! built and are meant to be shared behind an `Arc`.

use smsguard_core::{
    Class, CorpusConfig, CorpusSummary, LabelPair, LabeledRecord, PredictionResult, Scale,
};
use thiserror::Error;
use tracing::info;

use crate::classifier::predict;
use crate::index::ClassWordIndex;
use crate::tokenizer::Cleaner;

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("corpus {name:?} produced an empty index ({records} records read)")]
    EmptyCorpus { name: String, records: usize },

    #[error("corpus {name:?} has no {label:?} records to index ({records} records read)")]
    MissingClass {
        name: String,
        label: String,
        records: usize,
    },

    #[error("corpus {0:?} is defined twice")]
    DuplicateCorpus(String),
}

/// Cleaner + index + labels + scale for a single corpus.
#[derive(Debug, Clone)]
pub struct CorpusClassifier {
    name: String,
    labels: LabelPair,
    cleaner: Cleaner,
    index: ClassWordIndex,
    scale: Scale,
}

impl CorpusClassifier {
    /// Index `records` according to `config`.
    ///
    /// Fails when either class ends up with no words, unless the corpus
    /// allows it. A one-sided index would quietly skew every answer.
    pub fn build(
        config: &CorpusConfig,
        records: &[LabeledRecord],
    ) -> Result<Self, ClassifyError> {
        let cleaner = Cleaner::from_config(config.policy, &config.stopwords);
        let index = ClassWordIndex::build(records, &cleaner, &config.labels, config.mode);

        if !config.allow_empty {
            if index.is_empty() {
                return Err(ClassifyError::EmptyCorpus {
                    name: config.name.clone(),
                    records: records.len(),
                });
            }
            for class in [Class::Spam, Class::Ham] {
                if index.bag(class).is_empty() {
                    return Err(ClassifyError::MissingClass {
                        name: config.name.clone(),
                        label: config.labels.name(class).to_string(),
                        records: records.len(),
                    });
                }
            }
        }

        Ok(Self::from_parts(
            config.name.clone(),
            config.labels.clone(),
            cleaner,
            index,
            config.scale,
        ))
    }

    pub fn from_parts(
        name: impl Into<String>,
        labels: LabelPair,
        cleaner: Cleaner,
        index: ClassWordIndex,
        scale: Scale,
    ) -> Self {
        Self {
            name: name.into(),
            labels,
            cleaner,
            index,
            scale,
        }
    }

    /// Clean `input` and score it against this corpus.
    pub fn classify(&self, input: &str) -> PredictionResult {
        let tokens = self.cleaner.clean(input);
        predict(&tokens, &self.index, &self.labels, self.scale)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &LabelPair {
        &self.labels
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    pub fn index(&self) -> &ClassWordIndex {
        &self.index
    }

    pub fn summary(&self) -> CorpusSummary {
        CorpusSummary {
            name: self.name.clone(),
            mode: self.index.mode(),
            scale: self.scale,
            spam_label: self.labels.spam.clone(),
            ham_label: self.labels.ham.clone(),
            records_indexed: self.index.records_indexed(),
            records_skipped: self.index.records_skipped(),
            spam_words: self.index.bag(Class::Spam).distinct_words(),
            ham_words: self.index.bag(Class::Ham).distinct_words(),
        }
    }
}

/// Every corpus served by the process, in configuration order.
#[derive(Debug, Clone, Default)]
pub struct CorpusSet {
    corpora: Vec<CorpusClassifier>,
}

impl CorpusSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, corpus: CorpusClassifier) -> Result<(), ClassifyError> {
        if self.get(corpus.name()).is_some() {
            return Err(ClassifyError::DuplicateCorpus(corpus.name));
        }
        info!(corpus = %corpus.name, "corpus ready");
        self.corpora.push(corpus);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CorpusClassifier> {
        self.corpora.iter().find(|c| c.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CorpusClassifier> {
        self.corpora.iter()
    }

    pub fn len(&self) -> usize {
        self.corpora.len()
    }

    pub fn is_empty(&self) -> bool {
        self.corpora.is_empty()
    }

    pub fn summaries(&self) -> Vec<CorpusSummary> {
        self.corpora.iter().map(CorpusClassifier::summary).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smsguard_core::{CleanPolicy, ScoringMode, SourceConfig, StopwordConfig, StopwordSet};

    fn config(name: &str) -> CorpusConfig {
        CorpusConfig {
            name: name.to_string(),
            source: SourceConfig::Store,
            labels: LabelPair::new("scam", "ham"),
            mode: ScoringMode::Multiset,
            scale: Scale::Ratio,
            policy: CleanPolicy::Tokenize,
            stopwords: StopwordConfig::Named(StopwordSet::None),
            allow_empty: false,
        }
    }

    fn records() -> Vec<LabeledRecord> {
        vec![
            LabeledRecord::new("scam", "free prize call now"),
            LabeledRecord::new("ham", "are you coming home now"),
        ]
    }

    #[test]
    fn build_and_classify() {
        let corpus = CorpusClassifier::build(&config("stored"), &records()).unwrap();
        assert_eq!(
            corpus.classify("Free call!"),
            PredictionResult::new("scam", 1.0)
        );
        assert_eq!(corpus.classify("now"), PredictionResult::unknown());
        assert_eq!(corpus.classify(""), PredictionResult::unknown());
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = CorpusClassifier::build(&config("stored"), &[]).unwrap_err();
        assert!(matches!(err, ClassifyError::EmptyCorpus { records: 0, .. }));
    }

    #[test]
    fn corpus_with_only_foreign_labels_is_rejected() {
        let records = vec![LabeledRecord::new("spam", "free prize")];
        assert!(CorpusClassifier::build(&config("stored"), &records).is_err());
    }

    #[test]
    fn one_sided_corpus_is_rejected() {
        let records = vec![
            LabeledRecord::new("scam", "free prize"),
            LabeledRecord::new("ham", "coming home"),
        ];
        let mut cfg = config("stored");
        cfg.labels = LabelPair::new("spam", "ham");
        let err = CorpusClassifier::build(&cfg, &records).unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::MissingClass { ref label, records: 2, .. } if label == "spam"
        ));

        cfg.allow_empty = true;
        let corpus = CorpusClassifier::build(&cfg, &records).unwrap();
        assert_eq!(corpus.summary().spam_words, 0);
    }

    #[test]
    fn empty_corpus_allowed_when_configured() {
        let mut cfg = config("stored");
        cfg.allow_empty = true;
        let corpus = CorpusClassifier::build(&cfg, &[]).unwrap();
        assert!(corpus.classify("free prize").is_unknown());
    }

    #[test]
    fn summary_reports_shape_of_index() {
        let corpus = CorpusClassifier::build(&config("stored"), &records()).unwrap();
        let summary = corpus.summary();
        assert_eq!(summary.name, "stored");
        assert_eq!(summary.mode, ScoringMode::Multiset);
        assert_eq!(summary.scale, Scale::Ratio);
        assert_eq!(summary.spam_label, "scam");
        assert_eq!(summary.records_indexed, 2);
        assert_eq!(summary.spam_words, 4);
        assert_eq!(summary.ham_words, 5);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["mode"], "multiset");
        assert_eq!(json["scale"], "ratio");
    }

    #[test]
    fn set_rejects_duplicates_and_looks_up_by_name() {
        let mut set = CorpusSet::new();
        set.insert(CorpusClassifier::build(&config("a"), &records()).unwrap())
            .unwrap();
        set.insert(CorpusClassifier::build(&config("b"), &records()).unwrap())
            .unwrap();

        let dup = set.insert(CorpusClassifier::build(&config("a"), &records()).unwrap());
        assert!(matches!(dup, Err(ClassifyError::DuplicateCorpus(name)) if name == "a"));

        assert_eq!(set.len(), 2);
        assert!(set.get("b").is_some());
        assert!(set.get("c").is_none());
        let names: Vec<_> = set.iter().map(|c| c.name()).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn same_pipeline_serves_different_label_pairs() {
        let mut english = config("english");
        english.labels = LabelPair::default();
        english.scale = Scale::Percent;
        let english_records = vec![
            LabeledRecord::new("spam", "win cash prize"),
            LabeledRecord::new("ham", "lunch at noon"),
            LabeledRecord::new("ham", "cash for lunch"),
        ];

        let english = CorpusClassifier::build(&english, &english_records).unwrap();
        let stored = CorpusClassifier::build(&config("stored"), &records()).unwrap();

        assert_eq!(
            english.classify("win cash"),
            PredictionResult::new("spam", 66.67)
        );
        assert_eq!(stored.classify("prize"), PredictionResult::new("scam", 1.0));
    }
}
