//! Test discovery
//!
//! Turns a manifest into a test tree through the installed suite strategy.
//! Every level below the root is handed to the strategy as a producer so the
//! strategy decides when children are discovered.

use anyhow::Result;
use std::rc::Rc;
use tracing::debug;

use super::builder::{ContextSuiteFactory, SuiteStrategy};
use super::manifest::{ClassSpec, Manifest, ModuleSpec};
use crate::config::RunConfig;
use crate::executor::command_body;
use crate::models::{Case, LazySuiteSource, Suite, TestNode};

/// Loads test trees for one run
pub struct TestLoader {
    config: Rc<RunConfig>,
    suite_strategy: Box<dyn SuiteStrategy>,
}

impl TestLoader {
    /// Create a loader using the host's default suite strategy
    pub fn new(config: Rc<RunConfig>) -> Self {
        let suite_strategy = Box::new(ContextSuiteFactory::new(config.clone()));
        Self {
            config,
            suite_strategy,
        }
    }

    /// Create a loader and let enabled plugins adjust it
    pub fn prepared(config: Rc<RunConfig>) -> Self {
        let mut loader = Self::new(config.clone());
        config.plugins.prepare_test_loader(&mut loader);
        loader
    }

    pub fn config(&self) -> Rc<RunConfig> {
        self.config.clone()
    }

    pub fn set_suite_strategy(&mut self, strategy: Box<dyn SuiteStrategy>) {
        self.suite_strategy = strategy;
    }

    /// Build the whole tree: one suite per module, one per class
    pub fn load_manifest(&self, manifest: &Manifest) -> Result<Suite> {
        debug!(
            "Loading {} modules ({} declared tests)",
            manifest.modules.len(),
            manifest.case_count()
        );

        self.suite_strategy.build(LazySuiteSource::producer(|| {
            manifest
                .modules
                .iter()
                .map(|module| self.load_module(module).map(TestNode::Suite))
                .collect()
        }))
    }

    fn load_module(&self, module: &ModuleSpec) -> Result<Suite> {
        debug!("Loading module {}", module.name);

        self.suite_strategy.build(LazySuiteSource::producer(|| {
            module
                .classes
                .iter()
                .map(|class| self.load_class(&module.name, class).map(TestNode::Suite))
                .collect()
        }))
    }

    fn load_class(&self, module: &str, class: &ClassSpec) -> Result<Suite> {
        debug!("Loading class {}.{}", module, class.name);

        let source = LazySuiteSource::producer(|| {
            Ok(class
                .methods
                .iter()
                .map(|method| {
                    let case = Case::new(module, &class.name, &method.name);
                    let case = match &method.command {
                        Some(command) => case.with_body(command_body(command)),
                        None => case,
                    };
                    TestNode::Case(case)
                })
                .collect())
        });

        self.suite_strategy.build_with_fixtures(source, class.fixtures())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::{CollectOnlyPlugin, PluginManager};
    use crate::utils::TracingObserver;

    const SAMPLE: &str = r#"
modules:
  - name: mod
    classes:
      - name: A
        setup: "true"
        methods:
          - name: t1
          - name: t2
      - name: B
        methods:
          - name: t3
  - name: other
    classes:
      - name: C
        methods:
          - name: t4
"#;

    fn collect_config() -> Rc<RunConfig> {
        let plugin = CollectOnlyPlugin::new(Rc::new(TracingObserver)).with_enabled(true);
        Rc::new(RunConfig::new(PluginManager::new().with_plugin(Box::new(plugin))))
    }

    fn class_suites(suite: &Suite) -> Vec<&Suite> {
        suite
            .iter()
            .filter_map(|module| match module {
                TestNode::Suite(module) => Some(module),
                TestNode::Case(_) => None,
            })
            .flat_map(|module| module.iter())
            .filter_map(|class| match class {
                TestNode::Suite(class) => Some(class),
                TestNode::Case(_) => None,
            })
            .collect()
    }

    #[test]
    fn test_tree_shape_and_order() {
        let manifest = Manifest::from_yaml_str(SAMPLE).unwrap();
        let loader = TestLoader::new(Rc::new(RunConfig::default()));
        let suite = loader.load_manifest(&manifest).unwrap();

        assert_eq!(suite.len(), 2);
        let ids: Vec<_> = suite.cases().iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec!["mod.A.t1", "mod.A.t2", "mod.B.t3", "other.C.t4"]);
        assert!(suite.cases().iter().all(|c| c.is_bound()));
    }

    #[test]
    fn test_default_loader_keeps_fixtures() {
        let manifest = Manifest::from_yaml_str(SAMPLE).unwrap();
        let loader = TestLoader::prepared(Rc::new(RunConfig::default()));
        let suite = loader.load_manifest(&manifest).unwrap();

        let classes = class_suites(&suite);
        assert_eq!(classes.len(), 3);
        assert!(classes[0].fixtures().is_some());
        assert!(classes[1].fixtures().is_none());
    }

    #[test]
    fn test_collect_plugin_installs_context_free_suites() {
        let manifest = Manifest::from_yaml_str(SAMPLE).unwrap();
        let loader = TestLoader::prepared(collect_config());
        let suite = loader.load_manifest(&manifest).unwrap();

        assert!(class_suites(&suite).iter().all(|c| c.fixtures().is_none()));
        assert_eq!(suite.cases().len(), 4);
    }

    #[test]
    fn test_empty_manifest() {
        let manifest = Manifest::from_yaml_str("modules: []\n").unwrap();
        let suite = TestLoader::prepared(collect_config())
            .load_manifest(&manifest)
            .unwrap();
        assert!(suite.is_empty());
    }
}
