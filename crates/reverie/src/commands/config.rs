//! Config command - configuration inspection and setup.

use anyhow::{Result, anyhow};
use reverie_config::{DatabaseConfig, IndexConfig, LoggingConfig, ReverieConfig};
use clap::{Args, Subcommand};

use super::Context;

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Show which config files are loaded and their precedence
    Which,

    /// Write a config file with the default settings
    Init {
        /// Create project-local config (./reverie.toml) instead of user config
        #[arg(long)]
        local: bool,
    },
}

/// Run the config command.
pub fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => cmd_show(ctx),
        ConfigCommand::Which => cmd_which(ctx),
        ConfigCommand::Init { local } => cmd_init(ctx, local),
    }
}

fn cmd_show(ctx: &Context) -> Result<()> {
    let loaded = &ctx.loaded;
    let config = &loaded.config;
    let index = config.index();
    let logging = config.logging();
    let db_path = ctx.db_path()?;

    if ctx.json_output {
        let value = serde_json::json!({
            "sources": loaded.loaded_from(),
            "database": { "path": db_path },
            "index": {
                "enabled": index.enabled,
                "url": index.url,
                "api_key": index.resolve_api_key().map(|_| "********"),
                "timeout_secs": index.timeout_secs,
            },
            "logging": logging,
            "warnings": loaded.warnings,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("# Reverie Configuration\n");

    let sources = loaded.loaded_from();
    if sources.is_empty() {
        println!("No config files loaded (using defaults)\n");
    } else {
        println!("Config files:");
        for source in &sources {
            println!("  {}", source.display());
        }
        println!();
    }

    println!("Database:");
    println!("  path: {}", db_path.display());
    println!();

    println!("Index:");
    println!("  enabled: {}", index.enabled);
    println!("  url: {}", index.url);
    println!("  timeout: {}s", index.timeout_secs);
    let key_status = if index.resolve_api_key().is_some() {
        "set"
    } else {
        "not set"
    };
    println!("  api key: {}", key_status);
    println!();

    println!("Logging:");
    println!("  console: {}", logging.console);
    println!("  file: {}", logging.file);
    if let Some(ref dir) = logging.dir {
        println!("  dir: {}", dir.display());
    }
    println!();

    if !loaded.warnings.is_empty() {
        println!("Warnings:");
        for w in &loaded.warnings {
            println!("  ⚠ {}", w);
        }
        println!();
    }

    if ctx.verbose {
        println!("---\nRaw config:\n");
        if let Ok(toml_str) = config.to_toml() {
            println!("{}", toml_str);
        }
    }

    Ok(())
}

fn cmd_which(ctx: &Context) -> Result<()> {
    println!("Config file search order (later overrides earlier):\n");

    for source in &ctx.loaded.sources {
        let status = if source.loaded {
            "✓ loaded"
        } else {
            "· not found"
        };
        println!("  {} {}", status, source.path.display());
    }

    println!();
    let loaded_count = ctx.loaded.loaded_from().len();
    if loaded_count == 0 {
        println!("No config files found.");
    } else {
        println!("{} config file(s) loaded.", loaded_count);
    }

    Ok(())
}

fn cmd_init(ctx: &Context, local: bool) -> Result<()> {
    // Sources hold the user layer (when a config dir is known) then the project layer
    let sources = &ctx.loaded.sources;
    let source = match (local, sources.as_slice()) {
        (true, [.., project]) => project,
        (false, [user, _]) => user,
        _ => return Err(anyhow!("Could not determine config directory")),
    };
    let path = &source.path;

    if path.exists() {
        println!("Config file already exists: {}", path.display());
        return Ok(());
    }

    let config = ReverieConfig {
        database: Some(DatabaseConfig::default()),
        index: Some(IndexConfig::default()),
        logging: Some(LoggingConfig::default()),
    };
    reverie_config::save_config(&config, path)?;

    println!("Created config file: {}", path.display());
    Ok(())
}
