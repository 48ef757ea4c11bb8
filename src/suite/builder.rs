//! Suite construction strategies
//!
//! A test loader hands every group of discovered tests to a [`SuiteStrategy`].
//! The host default keeps class fixtures; the collect-only factory builds
//! context-free suites.

use anyhow::Result;
use std::rc::Rc;

use crate::config::RunConfig;
use crate::models::{Fixtures, LazySuiteSource, Suite, TestNode};
use crate::utils::Observer;

/// Builds suites from (possibly lazy) child lists
pub trait SuiteStrategy {
    fn build(&self, source: LazySuiteSource<'_>) -> Result<Suite>;

    fn build_with_fixtures(
        &self,
        source: LazySuiteSource<'_>,
        fixtures: Fixtures,
    ) -> Result<Suite>;
}

/// Bind leaf cases to the run configuration; suites pass through unchanged
fn bind_node(test: TestNode, config: &Rc<RunConfig>) -> TestNode {
    match test {
        TestNode::Suite(suite) => TestNode::Suite(suite),
        TestNode::Case(case) => TestNode::Case(case.bind(config.clone())),
    }
}

/// Host default: suites keep their class fixtures
pub struct ContextSuiteFactory {
    config: Rc<RunConfig>,
}

impl ContextSuiteFactory {
    pub fn new(config: Rc<RunConfig>) -> Self {
        Self { config }
    }
}

impl SuiteStrategy for ContextSuiteFactory {
    fn build(&self, source: LazySuiteSource<'_>) -> Result<Suite> {
        let mut suite = Suite::new();
        for test in source.resolve()? {
            suite.push(bind_node(test, &self.config));
        }
        Ok(suite)
    }

    fn build_with_fixtures(
        &self,
        source: LazySuiteSource<'_>,
        fixtures: Fixtures,
    ) -> Result<Suite> {
        let suite = self.build(source)?;
        if fixtures.is_empty() {
            Ok(suite)
        } else {
            Ok(suite.with_fixtures(fixtures))
        }
    }
}

/// Collect-only suites.
///
/// Lazy sources are forced while the suite is built, so nested producers
/// resolve depth-first in declaration order. Fixtures are dropped.
pub struct CollectSuiteFactory {
    config: Rc<RunConfig>,
    observer: Rc<dyn Observer>,
}

impl CollectSuiteFactory {
    pub fn new(config: Rc<RunConfig>, observer: Rc<dyn Observer>) -> Self {
        Self { config, observer }
    }

    fn add_test(&self, suite: &mut Suite, test: TestNode) {
        let label = match &test {
            TestNode::Suite(inner) => format!("suite({} tests)", inner.len()),
            TestNode::Case(case) => case.id(),
        };
        self.observer.debug("add_test", &[("test", label)]);
        suite.push(bind_node(test, &self.config));
    }
}

impl SuiteStrategy for CollectSuiteFactory {
    fn build(&self, source: LazySuiteSource<'_>) -> Result<Suite> {
        let lazy = source.is_lazy();
        let tests = source.resolve()?;
        self.observer.debug(
            "suite_resolved",
            &[("lazy", lazy.to_string()), ("tests", tests.len().to_string())],
        );

        let mut suite = Suite::new();
        for test in tests {
            self.add_test(&mut suite, test);
        }
        Ok(suite)
    }

    fn build_with_fixtures(
        &self,
        source: LazySuiteSource<'_>,
        fixtures: Fixtures,
    ) -> Result<Suite> {
        if !fixtures.is_empty() {
            self.observer.debug("fixtures_skipped", &[]);
        }
        self.build(source)
    }
}
