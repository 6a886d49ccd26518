// TOML config adapter - Reads and writes AppConfig files

use std::path::{Path, PathBuf};

use tracing::info;

use crate::domain::config::AppConfig;
use crate::domain::errors::DomainError;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "stepdoc.toml";

/// TOML configuration adapter
pub struct TomlConfigAdapter;

impl TomlConfigAdapter {
    /// Parse a configuration document; missing keys keep their defaults
    pub fn parse(content: &str) -> Result<AppConfig, DomainError> {
        toml::from_str(content)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load a configuration file
    pub fn load(path: &Path) -> Result<AppConfig, DomainError> {
        if !path.exists() {
            return Err(DomainError::FileNotFound(format!(
                "Config file does not exist: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DomainError::FsFail(format!("Failed to read config file: {}", e)))?;
        let config = Self::parse(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `explicit` when given, else the default file if present, else nothing
    pub fn discover(explicit: Option<&Path>) -> Result<Option<AppConfig>, DomainError> {
        match explicit {
            Some(path) => Self::load(path).map(Some),
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(&default_path).map(Some)
                } else {
                    Ok(None)
                }
            }
        }
    }

    /// Serialize to a TOML document
    pub fn serialize(config: &AppConfig) -> Result<String, DomainError> {
        toml::to_string_pretty(config)
            .map_err(|e| DomainError::ConfigFail(format!("Failed to serialize config: {}", e)))
    }

    /// Write a configuration file, creating parent directories
    pub fn save(path: &Path, config: &AppConfig) -> Result<(), DomainError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                DomainError::FsFail(format!("Failed to create config directory: {}", e))
            })?;
        }

        std::fs::write(path, Self::serialize(config)?)
            .map_err(|e| DomainError::FsFail(format!("Failed to write config file: {}", e)))
    }
}
