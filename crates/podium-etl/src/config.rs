use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::source::SourcePaths;

/// Configuration for podium.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (PODIUM_* prefix)
/// 3. Config file (~/.config/podium/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the SQLite database.
    ///
    /// Can be set via:
    /// - CLI: --db /path/to/db
    /// - ENV: PODIUM_DATABASE_PATH
    /// - Config: database_path = "/path/to/db"
    /// - Default: ~/.local/share/podium/orchestra.db
    #[serde(default = "default_db_path")]
    pub database_path: PathBuf,

    /// Instrument reference list (`instrument,section` CSV).
    #[serde(default = "default_instruments_path")]
    pub instruments_path: PathBuf,

    /// Canonical name list (one name per line).
    #[serde(default = "default_names_path")]
    pub names_path: PathBuf,

    /// Assignment list (`name,instrument` CSV).
    #[serde(default = "default_assignments_path")]
    pub assignments_path: PathBuf,

    /// Log filter used when RUST_LOG is unset (e.g. "info", "podium_etl=debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_db_path(),
            instruments_path: default_instruments_path(),
            names_path: default_names_path(),
            assignments_path: default_assignments_path(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/podium/config.toml
    /// Reads environment variables with PODIUM_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("podium");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Load configuration with custom database path.
    ///
    /// This is used when the --db CLI flag is provided.
    pub fn load_with_db_path(db_path: PathBuf) -> Result<Self> {
        let mut config = Self::load()?;
        config.database_path = db_path;
        Ok(config)
    }

    /// The configured input files.
    #[must_use]
    pub fn sources(&self) -> SourcePaths {
        SourcePaths {
            instruments: self.instruments_path.clone(),
            names: self.names_path.clone(),
            assignments: self.assignments_path.clone(),
        }
    }
}

/// Get the default database path.
///
/// Returns: ~/.local/share/podium/orchestra.db (or platform equivalent)
fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("podium")
        .join("orchestra.db")
}

fn default_instruments_path() -> PathBuf {
    PathBuf::from("instruments.csv")
}

fn default_names_path() -> PathBuf {
    PathBuf::from("names.txt")
}

fn default_assignments_path() -> PathBuf {
    PathBuf::from("name_instrument.csv")
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/podium/config.toml
/// - macOS: ~/Library/Application Support/podium/config.toml
/// - Windows: %APPDATA%\podium\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("podium")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Podium Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (PODIUM_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Path to the SQLite database
#
# Every `podium run` moves an existing file aside to
# <database_path>.<timestamp>.bak and rebuilds from the sources below.
#
# Can also be set via:
# - CLI: podium --db /custom/path.db run
# - Environment: PODIUM_DATABASE_PATH=/custom/path.db
#
# Default: Platform-specific data directory
#database_path = "/path/to/custom/orchestra.db"

# Input sources (relative paths resolve against the working directory)
instruments_path = "instruments.csv"
names_path = "names.txt"
assignments_path = "name_instrument.csv"

# Default log filter when RUST_LOG is not set
log_level = "info"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
