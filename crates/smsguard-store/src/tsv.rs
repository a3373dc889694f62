//! Flat-file dataset: one `label<TAB>message` pair per line, no header.

use std::path::{Path, PathBuf};

use smsguard_core::LabeledRecord;
use tracing::{info, warn};

use crate::{DatasetSource, StoreError};

/// A tab-separated dataset file such as the SMS Spam Collection.
///
/// Only the first tab separates the columns, so messages may contain tabs.
/// Blank lines are ignored and lines without a tab are logged and skipped.
/// Invalid UTF-8 is replaced rather than rejected.
#[derive(Debug, Clone)]
pub struct TsvDataset {
    path: PathBuf,
}

impl TsvDataset {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse dataset content that is already in memory.
    pub fn parse(content: &str) -> Vec<LabeledRecord> {
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let mut records = Vec::new();

        for (lineno, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            match line.split_once('\t') {
                Some((label, text)) => records.push(LabeledRecord::new(label.trim(), text)),
                None => warn!(line = lineno + 1, "skipping dataset line without a tab"),
            }
        }

        records
    }
}

impl DatasetSource for TsvDataset {
    fn describe(&self) -> String {
        format!("tsv:{}", self.path.display())
    }

    fn fetch_all(&self) -> Result<Vec<LabeledRecord>, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::DatasetNotFound(self.path.clone()));
        }
        let bytes = std::fs::read(&self.path).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        let records = Self::parse(&String::from_utf8_lossy(&bytes));
        info!(
            path = %self.path.display(),
            count = records.len(),
            "read dataset file"
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_label_and_message() {
        let records = TsvDataset::parse(
            "ham\tGo until jurong point, crazy..\nspam\tFree entry in 2 a wkly comp\n",
        );
        assert_eq!(
            records,
            vec![
                LabeledRecord::new("ham", "Go until jurong point, crazy.."),
                LabeledRecord::new("spam", "Free entry in 2 a wkly comp"),
            ]
        );
    }

    #[test]
    fn only_first_tab_splits() {
        let records = TsvDataset::parse("spam\tcall\tnow\n");
        assert_eq!(records, vec![LabeledRecord::new("spam", "call\tnow")]);
    }

    #[test]
    fn skips_blank_and_malformed_lines() {
        let records = TsvDataset::parse("\nham\tok\r\nno tab here\n   \nspam\twin\n");
        assert_eq!(
            records,
            vec![
                LabeledRecord::new("ham", "ok"),
                LabeledRecord::new("spam", "win"),
            ]
        );
    }

    #[test]
    fn strips_byte_order_mark() {
        let records = TsvDataset::parse("\u{feff}ham\thello");
        assert_eq!(records[0].label, "ham");
    }

    #[test]
    fn fetch_all_reads_file() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("sms-datasets.txt");
        std::fs::write(&path, b"ham\tsee you\nspam\tWIN \xff cash\n").unwrap();

        let dataset = TsvDataset::new(&path);
        let records = dataset.fetch_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].text, "WIN \u{fffd} cash");
        assert!(dataset.describe().starts_with("tsv:"));
    }

    #[test]
    fn missing_file_errors() {
        let dataset = TsvDataset::new("/nonexistent/sms-datasets.txt");
        assert!(matches!(
            dataset.fetch_all(),
            Err(StoreError::DatasetNotFound(_))
        ));
    }
}
