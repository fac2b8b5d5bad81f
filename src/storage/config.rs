use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::models::DEFAULT_SLOT_MINUTES;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
}

/// General configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Key the appointment list is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Minutes per queued appointment in the wait-time report
    #[serde(default = "default_slot_minutes")]
    pub slot_minutes: u32,

    /// Write logs to a rotating file in the data directory
    #[serde(default)]
    pub log_to_file: bool,

    /// Level for the log file
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Level echoed to stderr when logging to file
    #[serde(default = "default_stderr_level")]
    pub stderr_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        GeneralConfig {
            storage_key: default_storage_key(),
            slot_minutes: default_slot_minutes(),
            log_to_file: false,
            log_level: default_log_level(),
            stderr_level: default_stderr_level(),
        }
    }
}

// Default value functions for serde
fn default_storage_key() -> String {
    "turnos".to_string()
}

fn default_slot_minutes() -> u32 {
    DEFAULT_SLOT_MINUTES
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_stderr_level() -> String {
    "warn".to_string()
}

/// Trait for configuration storage
pub trait ConfigStorage: Send + Sync {
    /// Load configuration from file
    fn load(&self) -> Result<Config>;

    /// Get the config file path
    fn path(&self) -> &PathBuf;

    /// Create default configuration file if it doesn't exist
    fn create_default(&self) -> Result<()>;
}

/// TOML-based implementation of ConfigStorage
pub struct TomlConfigStorage {
    path: PathBuf,
}

impl TomlConfigStorage {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigStorage { path }
    }
}

impl ConfigStorage for TomlConfigStorage {
    fn load(&self) -> Result<Config> {
        use anyhow::Context;
        use std::fs;

        if !self.path.exists() {
            log::info!(
                "Config file not found at {:?}, creating default configuration",
                self.path
            );
            self.create_default()?;
            return Ok(Config::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;

        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file {:?}", self.path))?;

        log::info!("Loaded configuration from {:?}", self.path);
        log::debug!(
            "Config: storage_key={}, slot_minutes={}",
            config.general.storage_key,
            config.general.slot_minutes
        );

        Ok(config)
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn create_default(&self) -> Result<()> {
        use anyhow::Context;
        use std::fs;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }

        let example_config = include_str!("../../turnos.toml.example");

        fs::write(&self.path, example_config)
            .with_context(|| format!("Failed to create default config at {:?}", self.path))?;

        log::info!("Created default configuration at {:?}", self.path);

        Ok(())
    }
}
