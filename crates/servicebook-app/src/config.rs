//! Configuration management for servicebook
//!
//! Config stored at: ~/.config/servicebook/config.json

use serde::{Deserialize, Serialize};
use servicebook_types::{ConfigError, OutputFormat, Result};
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Tenant/application id; records live under its scope path
    #[serde(default = "default_app_id")]
    pub app_id: String,

    /// Store directory override
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_app_id() -> String {
    "default-app-id".to_string()
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_id: default_app_id(),
            store_dir: None,
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("servicebook");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Get the record store directory path
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("servicebook");
        Ok(store_dir)
    }

    /// Collection scope key for this deployment's records
    pub fn scope_key(&self) -> String {
        format!("artifacts/{}/public/data/vehicleServices", self.app_id)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Servicebook Configuration")?;
        writeln!(f, "=========================")?;
        writeln!(f)?;
        writeln!(f, "App id:         {}", self.app_id)?;
        writeln!(f, "Scope key:      {}", self.scope_key())?;
        writeln!(
            f,
            "Store dir:      {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_key_uses_app_id_path_prefix() {
        let config = Config {
            app_id: "garage-west".to_string(),
            ..Config::default()
        };
        assert_eq!(
            config.scope_key(),
            "artifacts/garage-west/public/data/vehicleServices"
        );
    }

    #[test]
    fn test_default_app_id_matches_unconfigured_deployment() {
        assert_eq!(Config::default().app_id, "default-app-id");
    }
}
