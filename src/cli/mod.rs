//! CLI argument parsing
//!
//! Defines command-line interface using clap. Plugins add their own options
//! to the `run` subcommand on top of the derived command.

use clap::{CommandFactory, Parser, Subcommand};

use crate::plugin::PluginManager;

/// Enumerate and report test identities
#[derive(Parser, Debug)]
#[command(name = "testcollect")]
#[command(version)]
#[command(about = "Discover tests and report their identities, optionally without running them")]
#[command(long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Discover and run (or collect) the tests of a manifest
    Run(RunArgs),

    /// List discovered test identities without running anything
    List(ListArgs),

    /// Show or create the configuration file
    Config(ConfigArgs),

    /// Describe recognised environment variables
    Env,
}

/// Arguments for run command
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Test manifest (YAML or JSON)
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// Output format (table, json, json-pretty, csv, summary, names)
    #[arg(short, long)]
    pub format: Option<String>,

    /// Save results to file
    #[arg(short, long)]
    pub output: Option<String>,
}

/// Arguments for list command
#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Test manifest (YAML or JSON)
    #[arg(short, long)]
    pub manifest: Option<String>,

    /// Show suite nesting
    #[arg(short, long)]
    pub tree: bool,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write a default configuration file
    Init {
        /// Destination path
        #[arg(short, long, default_value = "testcollect.yaml")]
        path: String,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Derived command with plugin options registered on `run`
pub fn command_with_plugins(plugins: &PluginManager) -> clap::Command {
    Args::command().mut_subcommand("run", |run| plugins.register_options(run))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::CollectOnlyPlugin;
    use crate::utils::TracingObserver;
    use clap::FromArgMatches;
    use std::rc::Rc;

    #[test]
    fn test_args_parsing() {
        let args = Args::parse_from(["testcollect", "list", "--tree", "-m", "tests.yaml"]);
        match args.command {
            Command::List(list_args) => {
                assert!(list_args.tree);
                assert_eq!(list_args.manifest.as_deref(), Some("tests.yaml"));
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_run_args() {
        let args = Args::parse_from([
            "testcollect",
            "run",
            "--manifest",
            "tests.yaml",
            "--format",
            "names",
            "-v",
        ]);
        assert!(args.verbose);
        match args.command {
            Command::Run(run_args) => {
                assert_eq!(run_args.manifest.as_deref(), Some("tests.yaml"));
                assert_eq!(run_args.format.as_deref(), Some("names"));
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_plugin_flag_on_run() {
        let plugins = PluginManager::new().with_plugin(Box::new(CollectOnlyPlugin::new(
            Rc::new(TracingObserver),
        )));

        let matches = command_with_plugins(&plugins)
            .try_get_matches_from(["testcollect", "run", "--collect-only", "-m", "t.yaml"])
            .unwrap();
        let args = Args::from_arg_matches(&matches).unwrap();

        assert!(matches!(args.command, Command::Run(_)));
        let run = matches.subcommand_matches("run").unwrap();
        assert_eq!(run.get_one::<bool>("collect_only"), Some(&true));
    }

    #[test]
    fn test_plugin_flag_not_on_list() {
        let plugins = PluginManager::new().with_plugin(Box::new(CollectOnlyPlugin::new(
            Rc::new(TracingObserver),
        )));

        let result = command_with_plugins(&plugins)
            .try_get_matches_from(["testcollect", "list", "--collect-only"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_config_init_defaults() {
        let args = Args::parse_from(["testcollect", "config", "init"]);
        match args.command {
            Command::Config(ConfigArgs {
                action: ConfigAction::Init { path, force },
            }) => {
                assert_eq!(path, "testcollect.yaml");
                assert!(!force);
            }
            _ => panic!("Expected Config init"),
        }
    }

    #[test]
    fn test_command_is_consistent() {
        Args::command().debug_assert();
    }
}
