//! Startup: open the message store, read every dataset once, build the
//! corpora, and serve.

use std::path::Path;

use anyhow::{Context, Result};
use smsguard_classify::{CorpusClassifier, CorpusSet};
use smsguard_core::{Config, LabeledRecord, SourceConfig};
use smsguard_store::{DatasetSource, DuckStore, TsvDataset};
use tracing::info;

use crate::api::{AppState, router};

/// Open the message store: file-backed when `database` is set, in-memory otherwise.
pub fn open_store(database: Option<&Path>) -> Result<DuckStore> {
    match database {
        Some(path) => DuckStore::open_persistent(path)
            .with_context(|| format!("failed to open message store {}", path.display())),
        None => {
            info!("using in-memory message store");
            DuckStore::open().context("failed to open in-memory message store")
        }
    }
}

/// Build every configured corpus, reading each source exactly once.
///
/// `store` backs corpora whose source is the message table; it may be `None`
/// when no corpus uses it. Any read failure or empty index aborts startup.
pub fn build_corpora(config: &Config, store: Option<&DuckStore>) -> Result<CorpusSet> {
    let mut corpora = CorpusSet::new();

    for corpus in &config.corpora {
        let records = match &corpus.source {
            SourceConfig::Tsv { path } => fetch(&TsvDataset::new(path))?,
            SourceConfig::Store => {
                let store = store.with_context(|| {
                    format!("corpus {:?} reads the message store, but none is open", corpus.name)
                })?;
                fetch(store)?
            }
        };

        let classifier = CorpusClassifier::build(corpus, &records)
            .with_context(|| format!("failed to build corpus {:?}", corpus.name))?;
        corpora.insert(classifier)?;
    }

    info!(count = corpora.len(), "corpora built");
    Ok(corpora)
}

fn fetch(source: &dyn DatasetSource) -> Result<Vec<LabeledRecord>> {
    source
        .fetch_all()
        .with_context(|| format!("failed to read dataset {}", source.describe()))
}

/// Open the store and build the corpora for `config`.
pub fn bootstrap(config: &Config) -> Result<AppState> {
    let store = open_store(config.server.database.as_deref())?;
    let corpora = build_corpora(config, Some(&store))?;
    Ok(AppState::new(corpora, store))
}

/// Serve the API on `bind` until Ctrl-C.
pub async fn serve(state: AppState, bind: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            info!("shutting down");
        })
        .await?;

    Ok(())
}
