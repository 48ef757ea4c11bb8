//! Test execution runner
//!
//! Walks a test tree depth-first and reports every case to a result sink.
//! Each case is first offered to the plugin chain; a plugin that returns a
//! run procedure replaces the host's own execution for that case.

use anyhow::Result;
use std::rc::Rc;
use tracing::{debug, info, warn};

use super::command::{run_shell, CommandError};
use super::sink::{ResultCollector, ResultSink};
use crate::config::RunConfig;
use crate::models::{Case, CollectSummary, Suite, TestNode};
use crate::suite::{Manifest, TestLoader};
use crate::utils::Timer;

/// Sequential test runner
pub struct TestRunner {
    config: Rc<RunConfig>,
}

impl TestRunner {
    pub fn new(config: Rc<RunConfig>) -> Self {
        Self { config }
    }

    /// Discover a manifest and run it, collecting results
    pub fn run_manifest(&self, manifest: &Manifest) -> Result<CollectSummary> {
        let loader = TestLoader::prepared(self.config.clone());
        let suite = loader.load_manifest(manifest)?;
        self.run_collected(&suite)
    }

    /// Run a suite into a fresh collector
    pub fn run_collected(&self, suite: &Suite) -> Result<CollectSummary> {
        let mode = self.config.mode();
        info!("Running {} tests ({})", suite.cases().len(), mode);

        let timer = Timer::start("run");
        let mut collector = ResultCollector::new();
        self.run(suite, &mut collector)?;
        let summary = collector.into_summary(mode);

        info!(
            "Run completed in {}ms - Pass: {}/{} ({:.1}%)",
            timer.stop(),
            summary.passed,
            summary.total,
            summary.pass_rate()
        );

        Ok(summary)
    }

    /// Run every case in `suite`, depth-first
    pub fn run(&self, suite: &Suite, result: &mut dyn ResultSink) -> Result<()> {
        // Collect-only runs never execute fixture commands.
        let fixtures = suite.fixtures().filter(|_| !self.config.collect_only());

        if let Some(setup) = fixtures.and_then(|f| f.setup.as_deref()) {
            if let Err(e) = run_shell(setup) {
                warn!("Suite setup failed: {}", e);
                return self.report_setup_failure(suite, &e, result);
            }
        }

        for test in suite {
            match test {
                TestNode::Suite(inner) => self.run(inner, result)?,
                TestNode::Case(case) => self.run_case(test, case, result)?,
            }
        }

        if let Some(teardown) = fixtures.and_then(|f| f.teardown.as_deref()) {
            if let Err(e) = run_shell(teardown) {
                warn!("Suite teardown failed: {}", e);
            }
        }

        Ok(())
    }

    fn run_case(&self, test: &TestNode, case: &Case, result: &mut dyn ResultSink) -> Result<()> {
        let plugins = &self.config.plugins;

        if let Some(procedure) = plugins.prepare_test_case(test) {
            debug!("Intercepted {}", case);
            return procedure.run(result);
        }

        plugins.start_test(case)?;
        result.start_test(case)?;

        match case.invoke() {
            Ok(()) => {
                plugins.add_success(case)?;
                result.add_success(case)?;
            }
            Err(e) if is_spawn_error(&e) => {
                let message = e.to_string();
                plugins.add_error(case, &message)?;
                result.add_error(case, &message)?;
            }
            Err(e) => {
                let message = e.to_string();
                plugins.add_failure(case, &message)?;
                result.add_failure(case, &message)?;
            }
        }

        plugins.stop_test(case)?;
        result.stop_test(case)?;
        Ok(())
    }

    /// Every case under a suite whose setup failed is reported as an error
    fn report_setup_failure(
        &self,
        suite: &Suite,
        error: &CommandError,
        result: &mut dyn ResultSink,
    ) -> Result<()> {
        let plugins = &self.config.plugins;
        let message = format!("setup failed: {error}");

        for case in suite.cases() {
            plugins.start_test(case)?;
            result.start_test(case)?;
            plugins.add_error(case, &message)?;
            result.add_error(case, &message)?;
            plugins.stop_test(case)?;
            result.stop_test(case)?;
        }
        Ok(())
    }
}

fn is_spawn_error(error: &anyhow::Error) -> bool {
    error
        .downcast_ref::<CommandError>()
        .map(CommandError::is_spawn)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EnvBuilder;
    use crate::models::{Fixtures, RunMode, TestStatus};
    use crate::plugin::{CollectOnlyPlugin, PluginManager};
    use crate::utils::TracingObserver;
    use std::cell::Cell;

    const TREE: &str = r#"
modules:
  - name: mod
    classes:
      - name: A
        methods:
          - name: t1
          - name: t2
      - name: B
        methods:
          - name: t3
"#;

    fn config(collect_only: bool, tag_var: &str) -> Rc<RunConfig> {
        let plugin = CollectOnlyPlugin::new(Rc::new(TracingObserver))
            .with_enabled(collect_only)
            .with_tag_var(tag_var);
        Rc::new(RunConfig::new(
            PluginManager::new().with_plugin(Box::new(plugin)),
        ))
    }

    fn manifest() -> Manifest {
        Manifest::from_yaml_str(TREE).unwrap()
    }

    #[test]
    fn test_collect_only_reports_every_case_as_passed() {
        let runner = TestRunner::new(config(true, "TESTCOLLECT_E2E_TAG_UNSET"));
        let summary = runner.run_manifest(&manifest()).unwrap();

        assert_eq!(summary.mode, RunMode::Collect);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.errors, 0);
        assert_eq!(summary.identities(), vec!["mod:A.t1", "mod:A.t2", "mod:B.t3"]);
    }

    #[test]
    fn test_collect_only_with_tag() {
        let _guard = EnvBuilder::new()
            .var("TESTCOLLECT_E2E_TAG_SMOKE", "smoke")
            .apply_scoped();

        let runner = TestRunner::new(config(true, "TESTCOLLECT_E2E_TAG_SMOKE"));
        let summary = runner.run_manifest(&manifest()).unwrap();

        assert_eq!(
            summary.identities(),
            vec!["mod:A.t1-smoke", "mod:A.t2-smoke", "mod:B.t3-smoke"]
        );
        assert!(summary.was_successful());
    }

    #[test]
    fn test_collect_only_never_runs_bodies() {
        let config = config(true, "TESTCOLLECT_E2E_TAG_BODIES");
        let calls = Rc::new(Cell::new(0));

        let mut suite = Suite::new();
        for method in ["t1", "t2"] {
            let counter = calls.clone();
            let case = Case::new("mod", "A", method)
                .with_body(move || {
                    counter.set(counter.get() + 1);
                    anyhow::bail!("body ran")
                })
                .bind(config.clone());
            suite.push(case.into());
        }

        let summary = TestRunner::new(config).run_collected(&suite).unwrap();
        assert_eq!(summary.passed, 2);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_execute_mode_runs_bodies() {
        let config = config(false, "TESTCOLLECT_E2E_TAG_EXEC");
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        let passing = Case::new("mod", "A", "t1")
            .with_body(move || {
                counter.set(counter.get() + 1);
                Ok(())
            })
            .bind(config.clone());
        let failing = Case::new("mod", "A", "t2")
            .with_body(|| anyhow::bail!("assertion failed"))
            .bind(config.clone());

        let mut suite = Suite::new();
        suite.push(passing.into());
        suite.push(failing.into());

        let summary = TestRunner::new(config).run_collected(&suite).unwrap();
        assert_eq!(summary.mode, RunMode::Execute);
        assert_eq!(calls.get(), 1);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.identities(), vec!["mod.A.t1", "mod.A.t2"]);
        assert_eq!(
            summary.results[1].message.as_deref(),
            Some("assertion failed")
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_command_passes_in_collect_mode() {
        let manifest = Manifest::from_yaml_str(
            r#"
modules:
  - name: mod
    classes:
      - name: A
        setup: "exit 1"
        methods:
          - name: t1
            command: "exit 1"
"#,
        )
        .unwrap();

        let executed = TestRunner::new(config(false, "TESTCOLLECT_E2E_TAG_CMD"))
            .run_manifest(&manifest)
            .unwrap();
        assert_eq!(executed.results[0].status, TestStatus::Error);
        assert!(executed.results[0]
            .message
            .as_deref()
            .unwrap()
            .starts_with("setup failed"));

        let collected = TestRunner::new(config(true, "TESTCOLLECT_E2E_TAG_CMD"))
            .run_manifest(&manifest)
            .unwrap();
        assert_eq!(collected.results[0].status, TestStatus::Pass);
    }

    #[cfg(unix)]
    #[test]
    fn test_collect_only_skips_fixtures_of_prebuilt_suites() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("setup-ran");
        let fixtures = Fixtures {
            setup: Some(format!("touch {}", marker.display())),
            teardown: Some("exit 1".to_string()),
        };

        let collect = config(true, "TESTCOLLECT_E2E_TAG_FIXTURES");
        let mut suite = Suite::new().with_fixtures(fixtures.clone());
        suite.push(Case::new("mod", "A", "t1").bind(collect.clone()).into());

        let summary = TestRunner::new(collect).run_collected(&suite).unwrap();
        assert_eq!(summary.passed, 1);
        assert!(!marker.exists());

        let execute = config(false, "TESTCOLLECT_E2E_TAG_FIXTURES");
        let mut suite = Suite::new().with_fixtures(fixtures);
        suite.push(Case::new("mod", "A", "t1").bind(execute.clone()).into());

        TestRunner::new(execute).run_collected(&suite).unwrap();
        assert!(marker.exists());
    }

    #[test]
    fn test_repeated_runs_keep_order() {
        let runner = TestRunner::new(config(true, "TESTCOLLECT_E2E_TAG_REPEAT"));
        let first = runner.run_manifest(&manifest()).unwrap();
        let second = runner.run_manifest(&manifest()).unwrap();
        assert_eq!(first.identities(), second.identities());
    }
}
