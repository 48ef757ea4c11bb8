//! Ambient run configuration
//!
//! Shared by every case bound during discovery and by every prepared run
//! procedure.

use crate::models::RunMode;
use crate::plugin::{CollectOnlyPlugin, PluginManager};

/// Configuration for one collection run
#[derive(Debug)]
pub struct RunConfig {
    pub plugins: PluginManager,
}

impl RunConfig {
    pub fn new(plugins: PluginManager) -> Self {
        Self { plugins }
    }

    pub fn collect_only(&self) -> bool {
        self.plugins.is_enabled(CollectOnlyPlugin::NAME)
    }

    pub fn mode(&self) -> RunMode {
        if self.collect_only() {
            RunMode::Collect
        } else {
            RunMode::Execute
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::new(PluginManager::new())
    }
}
