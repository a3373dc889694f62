//! CLI command definitions and handlers

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use smsguard_classify::{CorpusClassifier, CorpusSet};
use smsguard_client::SmsGuardClient;
use smsguard_core::{Config, Scale};
use smsguard_server::{bootstrap, build_corpora, open_store, serve};
use smsguard_store::{DEFAULT_RECENT_LIMIT, DuckStore};
use tracing::{info, warn};

use crate::display;

const DEFAULT_URL: &str = "http://127.0.0.1:8000";

/// smsguard - bag-of-words SMS spam detection
#[derive(Parser, Debug)]
#[command(name = "smsguard")]
#[command(
    version,
    about = "Classify SMS messages as spam or ham by word overlap with labelled corpora",
    after_help = "\
Examples:
  smsguard serve                               Serve the HTTP API on 127.0.0.1:8000
  smsguard predict \"WIN a free prize now\"      Classify one message locally
  smsguard repl                                Interactive classification loop
  smsguard add --label scam \"Claim your prize\" Store a labelled message
  smsguard ask --url http://host:8000 \"hi\"     Classify via a running server"
)]
pub struct Cli {
    /// Configuration file (missing file means built-in defaults)
    #[arg(
        long,
        global = true,
        env = "SMSGUARD_CONFIG",
        default_value = smsguard_core::config::DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,

    /// Message store database file (overrides `server.database`)
    #[arg(long, global = true, env = "SMSGUARD_DATABASE")]
    pub database: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace); RUST_LOG takes precedence
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build every corpus and serve the HTTP API until Ctrl-C
    Serve {
        /// Address to listen on (overrides `server.bind`)
        #[arg(long, env = "SMSGUARD_BIND")]
        bind: Option<String>,
    },

    /// Classify one message against a locally built corpus
    Predict {
        /// Corpus name (default: first configured corpus)
        #[arg(long, short = 'c')]
        corpus: Option<String>,

        message: String,
    },

    /// Interactive loop: type a message, get a prediction; `exit` quits
    Repl {
        /// Corpus name (default: first configured corpus)
        #[arg(long, short = 'c')]
        corpus: Option<String>,
    },

    /// List configured corpora and the shape of their indices
    Corpora {
        /// Ask a running server instead of building locally
        #[arg(long)]
        url: Option<String>,
    },

    /// Store a labelled message
    Add {
        /// scam or ham
        #[arg(long, short = 'l')]
        label: String,

        /// Send to a running server instead of the local database
        #[arg(long)]
        url: Option<String>,

        message: String,
    },

    /// List the most recent stored messages
    Messages {
        #[arg(long, short = 'n', default_value_t = DEFAULT_RECENT_LIMIT)]
        limit: usize,
    },

    /// Stored message counts by label
    Stats {
        /// Ask a running server instead of the local database
        #[arg(long)]
        url: Option<String>,
    },

    /// Classify a message through a running server
    Ask {
        #[arg(long, env = "SMSGUARD_URL", default_value = DEFAULT_URL)]
        url: String,

        #[arg(long, short = 'c', default_value = "english")]
        corpus: String,

        message: String,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    if let Some(database) = cli.database {
        config.server.database = Some(database);
    }

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            let state = bootstrap(&config)?;
            serve(state, &config.server.bind).await
        }
        Commands::Predict { corpus, message } => {
            let corpora = local_corpora(&config)?;
            let classifier = pick_corpus(&corpora, corpus.as_deref())?;
            display::print_prediction(&classifier.classify(&message), classifier.scale());
            Ok(())
        }
        Commands::Repl { corpus } => {
            let corpora = local_corpora(&config)?;
            let classifier = pick_corpus(&corpora, corpus.as_deref())?;
            repl(classifier)
        }
        Commands::Corpora { url: Some(url) } => {
            let corpora = SmsGuardClient::new(url).corpora().await?;
            display::print_corpora(&corpora);
            Ok(())
        }
        Commands::Corpora { url: None } => {
            display::print_corpora(&local_corpora(&config)?.summaries());
            Ok(())
        }
        Commands::Add {
            label,
            url: Some(url),
            message,
        } => {
            let stored = SmsGuardClient::new(url).submit(&label, &message).await?;
            println!("Message added successfully! (id {})", stored.id);
            Ok(())
        }
        Commands::Add {
            label,
            url: None,
            message,
        } => {
            let store = persistent_store(&config)?;
            let stored = store.create_message(&label, &message)?;
            println!("Message added successfully! (id {})", stored.id);
            Ok(())
        }
        Commands::Messages { limit } => {
            let store = persistent_store(&config)?;
            display::print_stats(&store.stats()?);
            println!();
            display::print_messages(&store.recent_messages(limit)?);
            Ok(())
        }
        Commands::Stats { url: Some(url) } => {
            display::print_stats(&SmsGuardClient::new(url).stats().await?);
            Ok(())
        }
        Commands::Stats { url: None } => {
            display::print_stats(&persistent_store(&config)?.stats()?);
            Ok(())
        }
        Commands::Ask {
            url,
            corpus,
            message,
        } => {
            let client = SmsGuardClient::new(url);
            let result = client.predict(&corpus, &message).await?;
            let scale = remote_scale(&client, &corpus).await;
            display::print_prediction(&result, scale);
            Ok(())
        }
    }
}

/// Scale a remote corpus reports on; the default when the server cannot say.
async fn remote_scale(client: &SmsGuardClient, corpus: &str) -> Scale {
    match client.corpora().await {
        Ok(corpora) => corpora
            .into_iter()
            .find(|c| c.name == corpus)
            .map(|c| c.scale)
            .unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "could not list remote corpora, using default scale");
            Scale::default()
        }
    }
}

/// Build corpora for local use, opening the message store only when a corpus reads it.
fn local_corpora(config: &Config) -> Result<CorpusSet> {
    let store = if config.uses_store() {
        Some(open_store(config.server.database.as_deref())?)
    } else {
        None
    };
    build_corpora(config, store.as_ref())
}

fn pick_corpus<'a>(corpora: &'a CorpusSet, name: Option<&str>) -> Result<&'a CorpusClassifier> {
    match name {
        Some(name) => corpora
            .get(name)
            .with_context(|| format!("unknown corpus {name:?}")),
        None => corpora.iter().next().context("no corpus configured"),
    }
}

/// The configured database file; local message commands refuse to write to memory.
fn persistent_store(config: &Config) -> Result<DuckStore> {
    let Some(path) = config.server.database.as_deref() else {
        bail!("no message database configured; pass --database or set server.database");
    };
    open_store(Some(path))
}

fn repl(classifier: &CorpusClassifier) -> Result<()> {
    println!("=== SMS Spam Detector ({}) ===", classifier.name());
    println!("Type 'exit' to quit.\n");

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();
    let mut line = String::new();
    loop {
        print!("Enter your message: ");
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim_end_matches(['\r', '\n']);
        if is_exit(input) {
            break;
        }
        display::print_prediction(&classifier.classify(input), classifier.scale());
    }

    println!("Goodbye!");
    info!(corpus = classifier.name(), "repl closed");
    Ok(())
}

fn is_exit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("exit")
}
