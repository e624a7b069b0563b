//! CLI command handlers.

pub mod config;
pub mod thought;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use tracing::debug;

use reverie_config::{IndexConfig, LoadedConfig};
use reverie_index::{MarqoClient, SharedIndex};
use reverie_thoughts::{ThoughtService, ThoughtStore};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Merged configuration and where it came from.
    pub loaded: LoadedConfig,
    /// Database path given on the command line.
    pub db_override: Option<PathBuf>,
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
}

impl Context {
    pub fn new(
        loaded: LoadedConfig,
        db_override: Option<PathBuf>,
        json_output: bool,
        verbose: bool,
    ) -> Self {
        Self {
            loaded,
            db_override,
            json_output,
            verbose,
        }
    }

    /// Database path: `--db`, then `[database] path`, then the data directory.
    pub fn db_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.db_override {
            return Ok(path.clone());
        }
        let data_dir = reverie_config::data_dir()?;
        Ok(self.loaded.config.database().resolve_path(&data_dir))
    }

    /// Open the store and connect the index, if enabled.
    pub fn open_service(&self) -> Result<ThoughtService> {
        let path = self.db_path()?;
        let store = ThoughtStore::open(&path)
            .with_context(|| format!("failed to open thought database at {}", path.display()))?;
        let index = build_index(&self.loaded.config.index())?;
        Ok(ThoughtService::new(Arc::new(store), index))
    }
}

/// Build the Marqo client described by `[index]`, or `None` when disabled.
fn build_index(config: &IndexConfig) -> Result<Option<SharedIndex>> {
    if !config.enabled {
        debug!("Vector index disabled by config");
        return Ok(None);
    }

    let mut builder = MarqoClient::builder()
        .base_url(&config.url)
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("reverie/", env!("CARGO_PKG_VERSION")));
    if let Some(key) = config.resolve_api_key() {
        builder = builder.api_key(key);
    }

    let client = builder
        .build()
        .with_context(|| format!("invalid index url '{}'", config.url))?;
    let index: SharedIndex = Arc::new(client);
    Ok(Some(index))
}
