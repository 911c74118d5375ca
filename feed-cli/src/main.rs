//! # holdback
//!
//! Replay recorded relay feeds through an event holder.
//!
//! ## Commands
//!
//! - `replay`: Stream one or more JSON-lines feeds into a single timeline
//! - `config`: Show the effective configuration
//!
//! ## Example
//!
//! ```bash
//! # Two relays, overlapping events, deduplicated into one timeline
//! holdback replay relay-a.jsonl relay-b.jsonl
//!
//! # Hold new events after the first 20, reveal them 10 at a time
//! holdback replay --queue --initial-load 20 --flush-every 10 relay-a.jsonl
//!
//! # Hide an author
//! holdback replay --mute 3bf0c63f... relay-a.jsonl
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod feed;

use config::Config;

/// Replay recorded relay feeds through an event holder.
#[derive(Parser, Debug)]
#[command(name = "holdback")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Config file (default: ./holdback.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Stream feeds into one deduplicated, newest-first timeline
    Replay {
        /// JSON-lines feed files, one per relay
        #[arg(required = true)]
        feeds: Vec<PathBuf>,

        #[command(flatten)]
        overrides: Overrides,
    },

    /// Show the effective configuration
    Config {
        #[command(flatten)]
        overrides: Overrides,
    },
}

/// Flags that take precedence over the config file.
#[derive(clap::Args, Debug, Default)]
struct Overrides {
    /// Hold new events once the initial load is visible
    #[arg(long)]
    queue: bool,

    /// Events shown immediately before holding starts
    #[arg(long)]
    initial_load: Option<usize>,

    /// Reveal held events once this many are waiting (0 = at end only)
    #[arg(long)]
    flush_every: Option<usize>,

    /// Hide events from this author pubkey (repeatable)
    #[arg(long = "mute", value_name = "PUBKEY")]
    muted: Vec<String>,

    /// Maximum timeline lines to print
    #[arg(long)]
    limit: Option<usize>,
}

impl Overrides {
    fn apply(self, config: &mut Config) {
        if self.queue {
            config.holder.queue_after_initial_load = true;
        }
        if let Some(initial_load) = self.initial_load {
            config.holder.initial_load = initial_load;
        }
        if let Some(flush_every) = self.flush_every {
            config.holder.flush_every = flush_every;
        }
        if let Some(limit) = self.limit {
            config.display.limit = limit;
        }
        config.display.muted.extend(self.muted);
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("holdback=info,holdback_feed_core=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    match cli.command {
        Commands::Replay { feeds, overrides } => {
            overrides.apply(&mut config);
            tracing::info!(feeds = feeds.len(), "starting replay");
            commands::replay::run(&feeds, &config).await?;
        }
        Commands::Config { overrides } => {
            overrides.apply(&mut config);
            commands::config::run(&config)?;
        }
    }

    Ok(())
}
