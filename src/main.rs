//! testcollect - collect-only test discovery
//!
//! Discovers a declared test tree and reports every test under its
//! fully-qualified identity. In collect-only mode no test body runs: each
//! test is reported as an immediate success through the same notification
//! sequence a real run produces, so report writers and CI parsers see the
//! same names in the same order.
//!
//! ## Usage
//!
//! ```bash
//! # Run every test of a manifest
//! testcollect run --manifest tests.yaml
//!
//! # Report identities only, without running bodies
//! testcollect run --manifest tests.yaml --collect-only --format names
//!
//! # Same, switched on from the environment, with a tag on every name
//! TESTCOLLECT_COLLECT_ONLY=1 TEST_TAG=smoke testcollect run -m tests.yaml
//!
//! # Show the discovered tree
//! testcollect list --manifest tests.yaml --tree
//! ```

use anyhow::{anyhow, bail, Context, Result};
use clap::FromArgMatches;
use std::path::Path;
use std::rc::Rc;
use tracing::info;

mod cli;
mod config;
mod executor;
mod models;
mod output;
mod plugin;
mod suite;
mod utils;

use cli::Args;
use config::{print_env_help, AppConfig, EnvConfig, RunConfig};
use executor::TestRunner;
use output::{write_results_to_file, OutputFormat, ResultFormatter};
use plugin::{CollectOnlyPlugin, PluginManager};
use suite::{Manifest, TestLoader};
use utils::{init_logger, LogLevel, Observer, TracingObserver};

fn main() -> Result<()> {
    let observer: Rc<dyn Observer> = Rc::new(TracingObserver);
    let mut plugins =
        PluginManager::new().with_plugin(Box::new(CollectOnlyPlugin::new(observer.clone())));

    let matches = cli::command_with_plugins(&plugins).get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    let env = EnvConfig::load();
    let config_path = args.config.clone().or_else(|| env.config_file.clone());
    let app_config = AppConfig::load_or_default(config_path.as_deref())?;

    let level = if args.verbose || env.is_verbose() {
        LogLevel::Debug
    } else {
        LogLevel::from_str(&app_config.log_level).unwrap_or(LogLevel::Info)
    };
    init_logger(level);

    match args.command {
        cli::Command::Run(run_args) => {
            let run_matches = matches
                .subcommand_matches("run")
                .context("Missing run arguments")?;
            plugins.configure(run_matches, &app_config);
            run_tests(run_args, plugins, &app_config, &env)?;
        }
        cli::Command::List(list_args) => {
            list_tests(list_args, observer, &app_config, &env)?;
        }
        cli::Command::Config(config_args) => {
            manage_config(config_args, &app_config)?;
        }
        cli::Command::Env => {
            print_env_help();
        }
    }

    Ok(())
}

/// CLI > env > config file
fn resolve_manifest(arg: Option<String>, env: &EnvConfig, app: &AppConfig) -> Result<String> {
    arg.or_else(|| env.manifest.clone())
        .or_else(|| app.manifest.clone())
        .ok_or_else(|| anyhow!("No manifest given; pass --manifest or set TESTCOLLECT_MANIFEST"))
}

fn run_tests(
    args: cli::RunArgs,
    plugins: PluginManager,
    app: &AppConfig,
    env: &EnvConfig,
) -> Result<()> {
    let manifest_path = resolve_manifest(args.manifest, env, app)?;
    let manifest = Manifest::load(&manifest_path)?;

    let format_name = args
        .format
        .or_else(|| env.format.clone())
        .unwrap_or_else(|| app.format.clone());
    let format = OutputFormat::from_str(&format_name)
        .ok_or_else(|| anyhow!("Unknown output format: {format_name}"))?;

    let config = Rc::new(RunConfig::new(plugins));
    info!(
        "Loaded {} ({} declared tests, {})",
        manifest_path,
        manifest.case_count(),
        config.mode()
    );

    let summary = TestRunner::new(config).run_manifest(&manifest)?;
    println!("{}", ResultFormatter::new(format).format_summary(&summary));

    if let Some(output) = &args.output {
        write_results_to_file(output, &summary, format)?;
        info!("Results written to {}", output);
    }

    if !summary.was_successful() {
        std::process::exit(1);
    }

    Ok(())
}

fn list_tests(
    args: cli::ListArgs,
    observer: Rc<dyn Observer>,
    app: &AppConfig,
    env: &EnvConfig,
) -> Result<()> {
    let manifest_path = resolve_manifest(args.manifest, env, app)?;
    let manifest = Manifest::load(&manifest_path)?;

    let plugin = CollectOnlyPlugin::new(observer)
        .with_enabled(true)
        .with_tag_var(app.tag_var.clone());
    let config = Rc::new(RunConfig::new(
        PluginManager::new().with_plugin(Box::new(plugin)),
    ));

    let suite = TestLoader::prepared(config).load_manifest(&manifest)?;
    let formatter = ResultFormatter::default();

    if args.tree {
        print!("{}", formatter.format_tree(&suite));
    } else {
        for case in suite.cases() {
            println!("{}", case.description());
        }
    }

    Ok(())
}

fn manage_config(args: cli::ConfigArgs, current: &AppConfig) -> Result<()> {
    match args.action {
        cli::ConfigAction::Show => {
            print!("{}", serde_yaml::to_string(current)?);
        }
        cli::ConfigAction::Init { path, force } => {
            if Path::new(&path).exists() && !force {
                bail!("{path} already exists; pass --force to overwrite");
            }
            AppConfig::default().save(&path)?;
            println!("✓ Configuration written to {path}");
        }
    }

    Ok(())
}
