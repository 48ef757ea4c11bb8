//! Plugin chain
//!
//! Holds registered plugins in registration order and dispatches hooks.

use anyhow::Result;
use clap::{ArgMatches, Command};
use std::fmt;
use tracing::debug;

use super::{Plugin, RunProcedure};
use crate::config::AppConfig;
use crate::models::{Case, TestNode};
use crate::suite::TestLoader;

/// Ordered set of registered plugins
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Box<dyn Plugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plugin(mut self, plugin: Box<dyn Plugin>) -> Self {
        self.add(plugin);
        self
    }

    pub fn add(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Names of enabled plugins, in order
    pub fn enabled_names(&self) -> Vec<&'static str> {
        self.enabled().map(|p| p.name()).collect()
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.enabled().any(|p| p.name() == name)
    }

    fn enabled(&self) -> impl Iterator<Item = &dyn Plugin> + '_ {
        self.plugins
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| p.is_enabled())
    }

    /// Let every plugin, enabled or not, add its options
    pub fn register_options(&self, command: Command) -> Command {
        self.plugins
            .iter()
            .fold(command, |command, plugin| plugin.on_options_register(command))
    }

    /// Let every plugin read back its options
    pub fn configure(&mut self, matches: &ArgMatches, config: &AppConfig) {
        for plugin in &mut self.plugins {
            plugin.on_configure(matches, config);
        }
        debug!("Enabled plugins: {:?}", self.enabled_names());
    }

    pub fn prepare_test_loader(&self, loader: &mut TestLoader) {
        for plugin in self.enabled() {
            plugin.on_loader_prepare(loader);
        }
    }

    /// First enabled plugin that takes over the test wins
    pub fn prepare_test_case(&self, test: &TestNode) -> Option<RunProcedure> {
        self.enabled().find_map(|p| p.on_case_prepare(test))
    }

    /// First enabled plugin that names the case wins
    pub fn describe_test(&self, case: &Case) -> Option<String> {
        self.enabled().find_map(|p| p.on_describe(case))
    }

    pub fn start_test(&self, case: &Case) -> Result<()> {
        for plugin in self.enabled() {
            plugin.on_start_test(case)?;
        }
        Ok(())
    }

    pub fn add_success(&self, case: &Case) -> Result<()> {
        for plugin in self.enabled() {
            plugin.on_add_success(case)?;
        }
        Ok(())
    }

    pub fn add_failure(&self, case: &Case, message: &str) -> Result<()> {
        for plugin in self.enabled() {
            plugin.on_add_failure(case, message)?;
        }
        Ok(())
    }

    pub fn add_error(&self, case: &Case, message: &str) -> Result<()> {
        for plugin in self.enabled() {
            plugin.on_add_error(case, message)?;
        }
        Ok(())
    }

    pub fn stop_test(&self, case: &Case) -> Result<()> {
        for plugin in self.enabled() {
            plugin.on_stop_test(case)?;
        }
        Ok(())
    }
}

impl fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = self.plugins.iter().map(|p| p.name()).collect();
        f.debug_struct("PluginManager")
            .field("plugins", &names)
            .field("enabled", &self.enabled_names())
            .finish()
    }
}
