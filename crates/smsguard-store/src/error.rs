use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("dataset file not found: {0}")]
    DatasetNotFound(std::path::PathBuf),

    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no results for query")]
    NoResults,

    #[error("{field} is required")]
    MissingField { field: &'static str },

    #[error(transparent)]
    InvalidLabel(#[from] smsguard_core::ParseLabelError),

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("{0}")]
    Other(String),
}
