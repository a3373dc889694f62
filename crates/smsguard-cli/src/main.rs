//! smsguard - bag-of-words SMS spam detection
//!
//! Builds per-corpus word indices from labelled SMS datasets and classifies
//! messages locally, interactively, or behind an HTTP API.

mod cli;
mod display;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    tracing::debug!("smsguard v{}", env!("CARGO_PKG_VERSION"));
    cli::run(cli).await
}
