//! Test tree models
//!
//! Declared test cases, composite suites and the lazy sources suites are
//! built from.

#![allow(dead_code)]

use anyhow::Result;
use std::fmt;
use std::rc::Rc;

use crate::config::RunConfig;

/// Body of a declared test
pub type TestBody = Rc<dyn Fn() -> Result<()>>;

/// A single runnable test unit, identified by module, class and method
#[derive(Clone)]
pub struct Case {
    module: String,
    class: String,
    method: String,
    body: Option<TestBody>,
    config: Option<Rc<RunConfig>>,
}

impl Case {
    pub fn new(
        module: impl Into<String>,
        class: impl Into<String>,
        method: impl Into<String>,
    ) -> Self {
        Self {
            module: module.into(),
            class: class.into(),
            method: method.into(),
            body: None,
            config: None,
        }
    }

    /// Attach the real test body
    pub fn with_body(mut self, body: impl Fn() -> Result<()> + 'static) -> Self {
        self.body = Some(Rc::new(body));
        self
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Dotted id: `module.Class.method`
    pub fn id(&self) -> String {
        format!("{}.{}.{}", self.module, self.class, self.method)
    }

    /// Bind the case to the ambient run configuration
    pub fn bind(mut self, config: Rc<RunConfig>) -> Self {
        self.config = Some(config);
        self
    }

    pub fn config(&self) -> Option<&Rc<RunConfig>> {
        self.config.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.config.is_some()
    }

    /// Invoke the real test body. A case without a body passes trivially.
    pub fn invoke(&self) -> Result<()> {
        match &self.body {
            Some(body) => body(),
            None => Ok(()),
        }
    }

    /// Display name used in reports.
    ///
    /// The first enabled plugin that describes the case wins; unbound cases
    /// and cases nobody describes fall back to [`Case::id`].
    pub fn description(&self) -> String {
        self.config
            .as_ref()
            .and_then(|config| config.plugins.describe_test(self))
            .unwrap_or_else(|| self.id())
    }
}

impl fmt::Debug for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Case")
            .field("module", &self.module)
            .field("class", &self.class)
            .field("method", &self.method)
            .field("has_body", &self.body.is_some())
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl fmt::Display for Case {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.module, self.class, self.method)
    }
}

/// Class-level setup and teardown commands
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fixtures {
    pub setup: Option<String>,
    pub teardown: Option<String>,
}

impl Fixtures {
    pub fn is_empty(&self) -> bool {
        self.setup.is_none() && self.teardown.is_none()
    }
}

/// Ordered composite of cases and nested suites
#[derive(Clone, Debug, Default)]
pub struct Suite {
    tests: Vec<TestNode>,
    fixtures: Option<Fixtures>,
}

impl Suite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, test: TestNode) {
        self.tests.push(test);
    }

    pub fn with_fixtures(mut self, fixtures: Fixtures) -> Self {
        self.fixtures = Some(fixtures);
        self
    }

    pub fn fixtures(&self) -> Option<&Fixtures> {
        self.fixtures.as_ref()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TestNode> {
        self.tests.iter()
    }

    pub fn len(&self) -> usize {
        self.tests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// All cases, depth-first, left to right
    pub fn cases(&self) -> Vec<&Case> {
        let mut cases = Vec::new();
        self.collect_cases(&mut cases);
        cases
    }

    fn collect_cases<'s>(&'s self, out: &mut Vec<&'s Case>) {
        for test in &self.tests {
            match test {
                TestNode::Suite(suite) => suite.collect_cases(out),
                TestNode::Case(case) => out.push(case),
            }
        }
    }
}

impl<'s> IntoIterator for &'s Suite {
    type Item = &'s TestNode;
    type IntoIter = std::slice::Iter<'s, TestNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.tests.iter()
    }
}

/// Node of a test tree
#[derive(Clone, Debug)]
pub enum TestNode {
    Suite(Suite),
    Case(Case),
}

impl TestNode {
    pub fn as_case(&self) -> Option<&Case> {
        match self {
            TestNode::Case(case) => Some(case),
            TestNode::Suite(_) => None,
        }
    }
}

impl From<Case> for TestNode {
    fn from(case: Case) -> Self {
        TestNode::Case(case)
    }
}

impl From<Suite> for TestNode {
    fn from(suite: Suite) -> Self {
        TestNode::Suite(suite)
    }
}

/// Children of a suite, either materialized or deferred behind a producer
pub enum LazySuiteSource<'a> {
    Sequence(Vec<TestNode>),
    Producer(Box<dyn FnOnce() -> Result<Vec<TestNode>> + 'a>),
}

impl<'a> LazySuiteSource<'a> {
    pub fn sequence(tests: Vec<TestNode>) -> Self {
        LazySuiteSource::Sequence(tests)
    }

    pub fn producer(producer: impl FnOnce() -> Result<Vec<TestNode>> + 'a) -> Self {
        LazySuiteSource::Producer(Box::new(producer))
    }

    pub fn is_lazy(&self) -> bool {
        matches!(self, LazySuiteSource::Producer(_))
    }

    /// Force the source. Producer errors are returned as-is.
    pub fn resolve(self) -> Result<Vec<TestNode>> {
        match self {
            LazySuiteSource::Sequence(tests) => Ok(tests),
            LazySuiteSource::Producer(producer) => producer(),
        }
    }
}

impl Default for LazySuiteSource<'_> {
    fn default() -> Self {
        LazySuiteSource::Sequence(Vec::new())
    }
}

impl fmt::Debug for LazySuiteSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LazySuiteSource::Sequence(tests) => f.debug_tuple("Sequence").field(tests).finish(),
            LazySuiteSource::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}
