//! Storage layer: flat-file datasets and the DuckDB-backed message store.

mod error;
mod source;
mod tsv;

pub use error::StoreError;
pub use source::DatasetSource;
pub use tsv::TsvDataset;

#[cfg(feature = "duckdb")]
mod duck;
#[cfg(feature = "duckdb")]
pub use duck::{DEFAULT_RECENT_LIMIT, DuckStore, MAX_RECENT_LIMIT};
