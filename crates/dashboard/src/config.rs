//! Dashboard configuration.
//!
//! Values come from built-in defaults, then an optional TOML file, then
//! command-line flags or their environment variables.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Command-line arguments. Every flag can also be set from the environment.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "gangawatch", about = "River water quality forecast dashboard")]
pub struct Cli {
    /// TOML configuration file
    #[arg(long, env = "DASHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Server bind address (e.g. 127.0.0.1:8501)
    #[arg(long, env = "DASHBOARD_BIND")]
    pub bind: Option<String>,

    /// Directory holding the per-city forecast artifacts
    #[arg(long, env = "DASHBOARD_DATA_ROOT")]
    pub data_root: Option<PathBuf>,

    /// Maximum forecast rows rendered on the page
    #[arg(long, env = "DASHBOARD_MAX_TABLE_ROWS")]
    pub max_table_rows: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server bind address
    pub bind_address: String,
    /// Root of the `{city}/forecasts` and `{city}/visualizations` trees
    pub data_root: PathBuf,
    /// Rows beyond this are counted but not rendered
    pub max_table_rows: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8501".to_string(),
            data_root: PathBuf::from("."),
            max_table_rows: 1000,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Build the effective configuration from parsed arguments.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(bind) = &cli.bind {
            config.bind_address = bind.clone();
        }
        if let Some(root) = &cli.data_root {
            config.data_root = root.clone();
        }
        if let Some(rows) = cli.max_table_rows {
            config.max_table_rows = rows;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.data_root.is_dir() {
            return Err(ConfigError::MissingDataRoot(self.data_root.clone()));
        }
        if self.max_table_rows == 0 {
            return Err(ConfigError::Invalid("max_table_rows must be at least 1"));
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {detail}")]
    Parse { path: PathBuf, detail: String },

    #[error("Data root is not a directory: {0}")]
    MissingDataRoot(PathBuf),

    #[error("Invalid configuration: {0}")]
    Invalid(&'static str),
}
