pub mod config;
pub mod message;
pub mod prediction;
pub mod record;

pub use config::{
    CleanPolicy, Config, ConfigError, CorpusConfig, ServerConfig, SourceConfig, StopwordConfig,
    StopwordSet,
};
pub use message::{MessageLabel, MessageStats, ParseLabelError, StoredMessage};
pub use prediction::{CorpusSummary, PredictionResult, Scale, ScoringMode, UNKNOWN};
pub use record::{Class, LabelPair, LabeledRecord};
