//! Configuration management for macaronictl

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default location of the system configuration file
pub const DEFAULT_CONFIG_PATH: &str = "/etc/macaroni/macaronictl.toml";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Name or path of the package search binary
    pub luet_binary: String,

    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            luet_binary: "luet".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `MACARONICTL_CONFIG`, the system file, or defaults
    pub fn load() -> Result<Self> {
        let path = env::var("MACARONICTL_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));

        let mut config = if path.exists() {
            Self::from_file(&path)?
        } else {
            debug!("No configuration file at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Load configuration from an explicit TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;

        let config: Config = toml::from_str(&data)
            .with_context(|| format!("Invalid configuration file {}", path.display()))?;

        debug!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    fn apply_env(&mut self) {
        if let Ok(luet) = env::var("MACARONICTL_LUET") {
            if !luet.is_empty() {
                debug!("luet binary override from environment: {}", luet);
                self.luet_binary = luet;
            }
        }
    }
}
