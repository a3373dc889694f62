//! TOML configuration: server settings and the corpora to index at startup.
//!
//! Every field has a default, so an absent file (or an empty one) yields a
//! single `english` corpus read from `sms-datasets.txt`.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::prediction::{Scale, ScoringMode};
use crate::record::LabelPair;

pub const DEFAULT_CONFIG_FILE: &str = "smsguard.toml";
pub const DEFAULT_BIND: &str = "127.0.0.1:8000";
pub const DEFAULT_DATASET: &str = "sms-datasets.txt";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(rename = "corpus")]
    pub corpora: Vec<CorpusConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// DuckDB file for stored messages. In-memory when unset.
    pub database: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            database: None,
        }
    }
}

/// One classification corpus: where its records come from and how they are
/// cleaned, indexed, and scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    pub name: String,
    pub source: SourceConfig,
    pub labels: LabelPair,
    pub mode: ScoringMode,
    pub scale: Scale,
    pub policy: CleanPolicy,
    pub stopwords: StopwordConfig,
    /// Serve even when no record produced a single indexed word.
    pub allow_empty: bool,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            name: "english".to_string(),
            source: SourceConfig::Tsv {
                path: PathBuf::from(DEFAULT_DATASET),
            },
            labels: LabelPair::default(),
            mode: ScoringMode::default(),
            scale: Scale::default(),
            policy: CleanPolicy::default(),
            stopwords: StopwordConfig::default(),
            allow_empty: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Tab-separated `label<TAB>message` file without a header row.
    Tsv { path: PathBuf },
    /// The `sms_messages` table of the message store.
    Store,
}

/// How raw text is split into words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanPolicy {
    /// Split on word boundaries, then drop punctuation tokens.
    #[default]
    Tokenize,
    /// Delete non-word characters in one pass, then split on whitespace.
    Strip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopwordSet {
    English,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StopwordConfig {
    Named(StopwordSet),
    Words(Vec<String>),
}

impl Default for StopwordConfig {
    fn default() -> Self {
        Self::Named(StopwordSet::English)
    }
}

impl Config {
    /// Load configuration from `path`, falling back to defaults when the file
    /// does not exist. Relative dataset paths resolve against the file's
    /// directory.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!(path = %path.display(), "no config file, using defaults");
            let config = Self::default_config();
            config.validate()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        info!(
            path = %path.display(),
            corpora = config.corpora.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(s)?;
        if config.corpora.is_empty() {
            config.corpora.push(CorpusConfig::default());
        }
        for corpus in &mut config.corpora {
            corpus.name = corpus.name.trim().to_string();
            corpus.labels.normalize();
        }
        config.validate()?;
        Ok(config)
    }

    /// Defaults: one `english` corpus from `sms-datasets.txt`.
    pub fn default_config() -> Self {
        Self {
            server: ServerConfig::default(),
            corpora: vec![CorpusConfig::default()],
        }
    }

    pub fn corpus(&self, name: &str) -> Option<&CorpusConfig> {
        self.corpora.iter().find(|c| c.name == name)
    }

    /// Whether any corpus reads from the message store.
    pub fn uses_store(&self) -> bool {
        self.corpora
            .iter()
            .any(|c| matches!(c.source, SourceConfig::Store))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.corpora.is_empty() {
            return Err(ConfigError::Invalid("at least one corpus is required".into()));
        }

        let mut seen = HashSet::new();
        for corpus in &self.corpora {
            let name = corpus.name.trim();
            if name.is_empty() {
                return Err(ConfigError::Invalid("corpus name must not be empty".into()));
            }
            if !seen.insert(name) {
                return Err(ConfigError::Invalid(format!("duplicate corpus {name:?}")));
            }

            let spam = corpus.labels.spam.trim();
            let ham = corpus.labels.ham.trim();
            if spam.is_empty() || ham.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "corpus {name:?}: labels must not be empty"
                )));
            }
            if spam.eq_ignore_ascii_case(ham) {
                return Err(ConfigError::Invalid(format!(
                    "corpus {name:?}: spam and ham labels must differ"
                )));
            }
        }
        Ok(())
    }

    fn resolve_paths(&mut self, base: &Path) {
        for corpus in &mut self.corpora {
            if let SourceConfig::Tsv { path } = &mut corpus.source
                && path.is_relative()
            {
                *path = base.join(&*path);
            }
        }
        if let Some(db) = &mut self.server.database
            && db.is_relative()
        {
            *db = base.join(&*db);
        }
    }
}
