//! Reverie - thought records for bots, mirrored into a vector index
//!
//! Main entry point for the Reverie CLI.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::warn;

mod commands;

use commands::{config, thought};

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Reverie - thought records for bots, mirrored into a vector index
#[derive(Parser)]
#[command(name = "reverie")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output as JSON (for scripting)
    #[arg(long, global = true)]
    pub json: bool,

    /// User config directory (default: platform config dir)
    #[arg(long, global = true, env = "REVERIE_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Thought database path (overrides [database] path)
    #[arg(long, global = true, env = "REVERIE_DB")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Record, inspect and remove thoughts
    Thought(thought::ThoughtArgs),

    /// Configuration management
    Config(config::ConfigArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = reverie_config::load_config_with_options(None, cli.config_dir.as_deref())?;
    let logging = loaded.config.logging();

    // Initialize tracing: console (human-readable, stderr) + rolling JSON file
    let console_filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("reverie=debug,reverie_thoughts=debug,reverie_index=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&logging.console))
    };

    let log_dir = logging
        .dir
        .clone()
        .or_else(|| reverie_config::data_dir().ok().map(|d| d.join("logs")));
    let (file_writer, _guard) = match log_dir {
        Some(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "reverie.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (Some(non_blocking), Some(guard))
        }
        None => (None, None),
    };

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_ansi(std::io::stderr().is_terminal())
                .with_writer(std::io::stderr)
                .with_filter(console_filter),
        )
        .with(file_writer.map(|writer| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(writer)
                .with_filter(tracing_subscriber::EnvFilter::new(&logging.file))
        }))
        .init();

    for warning in &loaded.warnings {
        warn!("{}", warning);
    }

    let ctx = commands::Context::new(loaded, cli.db, cli.json, cli.verbose);

    match cli.command {
        Commands::Thought(args) => thought::run(args, &ctx),
        Commands::Config(args) => config::run(args, &ctx),
    }
}
