//! Plugin hooks
//!
//! The host calls into plugins at fixed lifecycle points:
//!
//! - option registration and configuration, before discovery
//! - loader preparation, when a test loader is created
//! - case preparation, right before a case would run
//! - description, whenever a case is named in a report
//! - result notifications, alongside every result sink call
//!
//! Every hook has a no-op default so a plugin only implements what it needs.

mod collect;
mod identity;
mod manager;

pub use collect::{CollectOnlyPlugin, RunProcedure, COLLECT_ONLY_ENV, DEFAULT_TAG_VAR};
pub use manager::PluginManager;

use anyhow::Result;
use clap::{ArgMatches, Command};

use crate::config::AppConfig;
use crate::models::{Case, TestNode};
use crate::suite::TestLoader;

/// Lifecycle hooks a plugin may implement
pub trait Plugin {
    /// Unique plugin name
    fn name(&self) -> &'static str;

    /// Only enabled plugins receive loader, case, describe and result hooks
    fn is_enabled(&self) -> bool;

    /// Add command-line options
    fn on_options_register(&self, command: Command) -> Command {
        command
    }

    /// Read back parsed options and file configuration
    fn on_configure(&mut self, _matches: &ArgMatches, _config: &AppConfig) {}

    /// Adjust a freshly created test loader
    fn on_loader_prepare(&self, _loader: &mut TestLoader) {}

    /// Replace how a test runs. `None` leaves the test to the host.
    fn on_case_prepare(&self, _test: &TestNode) -> Option<RunProcedure> {
        None
    }

    /// Display name for a case. `None` defers to the next plugin.
    fn on_describe(&self, _case: &Case) -> Option<String> {
        None
    }

    fn on_start_test(&self, _case: &Case) -> Result<()> {
        Ok(())
    }

    fn on_add_success(&self, _case: &Case) -> Result<()> {
        Ok(())
    }

    fn on_add_failure(&self, _case: &Case, _message: &str) -> Result<()> {
        Ok(())
    }

    fn on_add_error(&self, _case: &Case, _message: &str) -> Result<()> {
        Ok(())
    }

    fn on_stop_test(&self, _case: &Case) -> Result<()> {
        Ok(())
    }
}
