//! Collect-only mode
//!
//! Lists every discovered case under its reported identity and reports it as
//! passed without running its body. Discovery order, identity strings and
//! the result notification sequence are the same as a real run.

use anyhow::Result;
use clap::builder::BoolishValueParser;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::env;
use std::rc::Rc;

use super::identity::format_identity;
use super::Plugin;
use crate::config::{AppConfig, RunConfig};
use crate::executor::ResultSink;
use crate::models::{Case, TestNode};
use crate::suite::{CollectSuiteFactory, TestLoader};
use crate::utils::Observer;

/// Environment switch for collect-only mode
pub const COLLECT_ONLY_ENV: &str = "TESTCOLLECT_COLLECT_ONLY";

/// Environment variable read for the identity tag
pub const DEFAULT_TAG_VAR: &str = "TEST_TAG";

const ENABLE_OPT: &str = "collect_only";

/// Plugin that swaps test execution for immediate success
pub struct CollectOnlyPlugin {
    enabled: bool,
    tag_var: String,
    observer: Rc<dyn Observer>,
}

impl CollectOnlyPlugin {
    pub const NAME: &'static str = "collect-only";

    pub fn new(observer: Rc<dyn Observer>) -> Self {
        Self {
            enabled: false,
            tag_var: DEFAULT_TAG_VAR.to_string(),
            observer,
        }
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_tag_var(mut self, tag_var: impl Into<String>) -> Self {
        self.tag_var = tag_var.into();
        self
    }

    /// Current tag, read at call time. Unset means empty.
    pub fn tag(&self) -> String {
        env::var(&self.tag_var).unwrap_or_default()
    }
}

impl Plugin for CollectOnlyPlugin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn on_options_register(&self, command: Command) -> Command {
        command.arg(
            Arg::new(ENABLE_OPT)
                .long("collect-only")
                .env(COLLECT_ONLY_ENV)
                .action(ArgAction::SetTrue)
                .value_parser(BoolishValueParser::new())
                .help("Enable collect-only: report every test as passed without running it"),
        )
    }

    fn on_configure(&mut self, matches: &ArgMatches, config: &AppConfig) {
        let flag = matches
            .try_get_one::<bool>(ENABLE_OPT)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false);
        self.enabled = flag || config.collect_only;
        self.tag_var = config.tag_var.clone();
    }

    fn on_loader_prepare(&self, loader: &mut TestLoader) {
        self.observer.debug("prepare_test_loader", &[]);
        let factory = CollectSuiteFactory::new(loader.config(), self.observer.clone());
        loader.set_suite_strategy(Box::new(factory));
    }

    fn on_case_prepare(&self, test: &TestNode) -> Option<RunProcedure> {
        if !self.enabled {
            return None;
        }
        let TestNode::Case(case) = test else {
            return None;
        };
        let config = case.config()?.clone();
        self.observer
            .debug("prepare_test_case", &[("test", case.id())]);
        Some(RunProcedure::new(case.clone(), config))
    }

    fn on_describe(&self, case: &Case) -> Option<String> {
        Some(format_identity(case, &self.tag()))
    }
}

/// Replacement run step bound to one case.
///
/// Performs the result notifications of a passing test and nothing else.
pub struct RunProcedure {
    case: Case,
    config: Rc<RunConfig>,
}

impl RunProcedure {
    pub fn new(case: Case, config: Rc<RunConfig>) -> Self {
        Self { case, config }
    }

    /// Report the case as started, passed and stopped.
    ///
    /// Plugins hear each step before the sink does. The first failing
    /// notification aborts the rest.
    pub fn run(&self, result: &mut dyn ResultSink) -> Result<()> {
        let plugins = &self.config.plugins;
        let case = &self.case;

        plugins.start_test(case)?;
        result.start_test(case)?;
        plugins.add_success(case)?;
        result.add_success(case)?;
        plugins.stop_test(case)?;
        result.stop_test(case)?;
        Ok(())
    }
}
