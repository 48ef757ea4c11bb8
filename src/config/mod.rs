//! Configuration module
//!
//! Handles loading and managing configuration.

#![allow(dead_code)]

mod env;
mod run;

pub use env::{print_env_help, EnvConfig};
#[cfg(test)]
pub use env::EnvBuilder;
pub use run::RunConfig;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::output::OutputFormat;
use crate::plugin::DEFAULT_TAG_VAR;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./testcollect.yaml",
    "./testcollect.yml",
    "./.testcollect.yaml",
];

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Enable collect-only mode without passing the flag
    pub collect_only: bool,

    /// Environment variable holding the identity tag
    pub tag_var: String,

    /// Default output format
    pub format: String,

    /// Default test manifest
    pub manifest: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            collect_only: false,
            tag_var: DEFAULT_TAG_VAR.to_string(),
            format: "table".to_string(),
            manifest: None,
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Load configuration from the given path, or from the default location
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path.map(PathBuf::from).or_else(Self::find) {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?
        } else {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self).context("Failed to serialize config")?
        } else {
            serde_json::to_string_pretty(self).context("Failed to serialize config")?
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.tag_var.trim().is_empty() {
            bail!("tag_var must name an environment variable");
        }
        if OutputFormat::from_str(&self.format).is_none() {
            bail!("Unknown output format: {}", self.format);
        }
        Ok(())
    }
}

fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(!config.collect_only);
        assert_eq!(config.tag_var, "TEST_TAG");
        assert_eq!(config.format, "table");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("testcollect.yaml");

        let config = AppConfig {
            collect_only: true,
            manifest: Some("tests.yaml".to_string()),
            ..Default::default()
        };
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert!(loaded.collect_only);
        assert_eq!(loaded.manifest.as_deref(), Some("tests.yaml"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"collect_only": true}"#).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert!(loaded.collect_only);
        assert_eq!(loaded.tag_var, "TEST_TAG");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = AppConfig {
            tag_var: "  ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            format: "xml".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = AppConfig::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
