//! Configuration types mapping to the TOML schema.
//!
//! Top-level config:
//! ```toml
//! [database]               # SQLite location
//! [index]                  # vector index connection
//! [logging]                # console and file log filters
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Environment variable consulted for the index API key before the config file.
pub const INDEX_API_KEY_ENV: &str = "REVERIE_INDEX_API_KEY";

// ─────────────────────────────────────────────────────────────────────────────
// Top-level Config
// ─────────────────────────────────────────────────────────────────────────────

/// Root configuration structure.
///
/// All sections are optional so that partial configs (e.g., project-local
/// overrides) can be loaded and merged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReverieConfig {
    /// Thought database settings.
    pub database: Option<DatabaseConfig>,

    /// Vector index settings.
    pub index: Option<IndexConfig>,

    /// Logging settings.
    pub logging: Option<LoggingConfig>,
}

impl ReverieConfig {
    /// Create an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from a TOML string.
    pub fn from_toml(toml_str: &str) -> crate::Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize to a TOML string.
    pub fn to_toml(&self) -> crate::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Merge another config on top of this one (other takes priority).
    ///
    /// Sections are replaced whole, not field by field.
    pub fn merge(&mut self, other: ReverieConfig) {
        if other.database.is_some() {
            self.database = other.database;
        }

        if other.index.is_some() {
            self.index = other.index;
        }

        if other.logging.is_some() {
            self.logging = other.logging;
        }
    }

    /// The `[database]` section, or defaults.
    pub fn database(&self) -> DatabaseConfig {
        self.database.clone().unwrap_or_default()
    }

    /// The `[index]` section, or defaults.
    pub fn index(&self) -> IndexConfig {
        self.index.clone().unwrap_or_default()
    }

    /// The `[logging]` section, or defaults.
    pub fn logging(&self) -> LoggingConfig {
        self.logging.clone().unwrap_or_default()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Database Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Thought database configuration.
///
/// ```toml
/// [database]
/// path = "/var/lib/reverie/reverie.db"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path to the SQLite database. Relative paths are resolved from the data directory.
    pub path: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Resolve the database path against a data directory.
    pub fn resolve_path(&self, data_dir: &Path) -> PathBuf {
        match &self.path {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => data_dir.join(path),
            None => data_dir.join("reverie.db"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Vector index connection.
///
/// ```toml
/// [index]
/// enabled = true
/// url = "http://localhost:8882"
/// timeout_secs = 10
/// ```
///
/// The index name is fixed to the thoughts table and cannot be configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    /// Whether writes are mirrored to the index.
    pub enabled: bool,
    /// Base URL of the Marqo server.
    pub url: String,
    /// API key sent as `x-api-key` (prefer `REVERIE_INDEX_API_KEY`).
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "http://localhost:8882".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl IndexConfig {
    /// Check if an API key is stored directly in the config.
    pub fn has_plaintext_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Resolve the API key: environment variable first, then config file.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(INDEX_API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.api_key.clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Logging Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Logging configuration section.
///
/// Filters use `tracing_subscriber::EnvFilter` syntax. `RUST_LOG` overrides
/// the console filter when set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter for console output.
    pub console: String,
    /// Filter for the JSON log file.
    pub file: String,
    /// Directory for daily-rolling log files. `None` disables file logging.
    pub dir: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            console: "warn".to_string(),
            file: "info".to_string(),
            dir: None,
        }
    }
}
