//! Configuration for Reverie.
//!
//! Provides TOML-based configuration with:
//! - Thought database location (`[database]`)
//! - Vector index connection (`[index]`)
//! - Console and file log filters (`[logging]`)
//! - Config file layering (XDG user config + project-local overrides)

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, data_dir, load_config, load_config_file,
    load_config_with_options, save_config, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
