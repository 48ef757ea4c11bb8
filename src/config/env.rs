//! Environment variable configuration
//!
//! Provides environment variable overrides for configuration.

use std::env;

use crate::plugin::{COLLECT_ONLY_ENV, DEFAULT_TAG_VAR};

/// Environment variable prefix
const ENV_PREFIX: &str = "TESTCOLLECT";

/// Environment configuration from environment variables
#[derive(Clone, Debug, Default)]
pub struct EnvConfig {
    /// Manifest from TESTCOLLECT_MANIFEST
    pub manifest: Option<String>,
    /// Output format from TESTCOLLECT_FORMAT
    pub format: Option<String>,
    /// Config file from TESTCOLLECT_CONFIG
    pub config_file: Option<String>,
    /// Verbose from TESTCOLLECT_VERBOSE
    pub verbose: Option<bool>,
}

impl EnvConfig {
    /// Load configuration from environment variables
    pub fn load() -> Self {
        Self {
            manifest: get_env("MANIFEST"),
            format: get_env("FORMAT"),
            config_file: get_env("CONFIG"),
            verbose: get_env_bool("VERBOSE"),
        }
    }

    /// Check if any environment variables are set
    pub fn has_any(&self) -> bool {
        self.manifest.is_some()
            || self.format.is_some()
            || self.config_file.is_some()
            || self.verbose.is_some()
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose.unwrap_or(false)
    }
}

/// Get environment variable with prefix
fn get_env(name: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}_{name}")).ok()
}

/// Get environment variable as boolean
fn get_env_bool(name: &str) -> Option<bool> {
    get_env(name).map(|v| {
        matches!(
            v.to_lowercase().as_str(),
            "1" | "true" | "yes" | "on" | "enabled"
        )
    })
}

/// Builder for setting environment variables (useful for testing)
pub struct EnvBuilder {
    vars: Vec<(String, String)>,
}

impl EnvBuilder {
    /// Create a new environment builder
    pub fn new() -> Self {
        Self { vars: Vec::new() }
    }

    /// Set manifest path
    pub fn manifest(mut self, path: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_MANIFEST"), path.into()));
        self
    }

    /// Set output format
    pub fn format(mut self, format: impl Into<String>) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_FORMAT"), format.into()));
        self
    }

    /// Set verbose
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.vars.push((format!("{ENV_PREFIX}_VERBOSE"), verbose.to_string()));
        self
    }

    /// Set an arbitrary variable, such as an identity tag
    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.push((key.into(), value.into()));
        self
    }

    /// Apply environment variables
    pub fn apply(self) {
        for (key, value) in self.vars {
            env::set_var(key, value);
        }
    }

    /// Apply and return guard that restores on drop
    pub fn apply_scoped(self) -> EnvGuard {
        let previous: Vec<_> = self
            .vars
            .iter()
            .map(|(k, _)| (k.clone(), env::var(k).ok()))
            .collect();

        self.apply();

        EnvGuard { previous }
    }
}

impl Default for EnvBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard that restores environment variables on drop
pub struct EnvGuard {
    previous: Vec<(String, Option<String>)>,
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        for (key, value) in &self.previous {
            match value {
                Some(v) => env::set_var(key, v),
                None => env::remove_var(key),
            }
        }
    }
}

/// Print all recognised environment variables
pub fn print_env_help() {
    println!("Environment Variables:");
    println!();
    println!("  {COLLECT_ONLY_ENV}  Enable collect-only mode (1/true/yes/on)");
    println!("  {DEFAULT_TAG_VAR}                  Tag appended to every reported test name");
    println!("  {ENV_PREFIX}_MANIFEST      Path to the test manifest");
    println!("  {ENV_PREFIX}_FORMAT        Output format (table, json, csv, summary, names)");
    println!("  {ENV_PREFIX}_CONFIG        Path to configuration file");
    println!("  {ENV_PREFIX}_VERBOSE       Enable debug logging (true/false)");
    println!();
    println!("Example:");
    println!("  export {COLLECT_ONLY_ENV}=1");
    println!("  export {DEFAULT_TAG_VAR}=smoke");
    println!("  testcollect run --manifest tests.yaml --format names");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_config_default() {
        let config = EnvConfig::default();
        assert!(config.manifest.is_none());
        assert!(!config.is_verbose());
        assert!(!config.has_any());
    }

    #[test]
    fn test_env_builder() {
        let _guard = EnvBuilder::new()
            .manifest("suite.yaml")
            .format("json")
            .verbose(true)
            .apply_scoped();

        let config = EnvConfig::load();
        assert_eq!(config.manifest, Some("suite.yaml".to_string()));
        assert_eq!(config.format, Some("json".to_string()));
        assert!(config.is_verbose());
        assert!(config.has_any());
    }

    #[test]
    fn test_guard_restores_unset_var() {
        let key = "TESTCOLLECT_ENV_GUARD_PROBE";
        {
            let _guard = EnvBuilder::new().var(key, "set").apply_scoped();
            assert_eq!(env::var(key).ok(), Some("set".to_string()));
        }
        assert!(env::var(key).is_err());
    }
}
