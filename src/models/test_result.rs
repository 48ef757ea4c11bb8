//! Test result models
//!
//! Defines result status, per-case results and run summaries.

#![allow(dead_code)]

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a run treated test bodies
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Bodies were executed
    Execute,
    /// Bodies were skipped and every case reported as passed
    Collect,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Execute => write!(f, "execute"),
            RunMode::Collect => write!(f, "collect-only"),
        }
    }
}

/// Test execution status
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    Error,
}

impl TestStatus {
    pub fn symbol(&self) -> &'static str {
        match self {
            TestStatus::Pass => "✓",
            TestStatus::Fail => "✗",
            TestStatus::Error => "!",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TestStatus::Pass)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestStatus::Pass => write!(f, "PASS"),
            TestStatus::Fail => write!(f, "FAIL"),
            TestStatus::Error => write!(f, "ERROR"),
        }
    }
}

/// Result of a single reported case
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TestResult {
    pub identity: String,
    pub status: TestStatus,
    pub duration_ms: u64,
    pub message: Option<String>,
}

impl TestResult {
    pub fn pass(identity: impl Into<String>, duration_ms: u64) -> Self {
        Self {
            identity: identity.into(),
            status: TestStatus::Pass,
            duration_ms,
            message: None,
        }
    }

    pub fn fail(identity: impl Into<String>, duration_ms: u64, message: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            status: TestStatus::Fail,
            duration_ms,
            message: Some(message.into()),
        }
    }

    pub fn error(identity: impl Into<String>, duration_ms: u64, error: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            status: TestStatus::Error,
            duration_ms,
            message: Some(error.into()),
        }
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} [{}ms]",
            self.status.symbol(),
            self.identity,
            self.duration_ms
        )?;
        if let Some(msg) = &self.message {
            write!(f, " - {msg}")?;
        }
        Ok(())
    }
}

/// Summary of one run over a test tree
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollectSummary {
    pub mode: RunMode,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errors: usize,
    pub total_duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl CollectSummary {
    pub fn new(mode: RunMode, results: Vec<TestResult>) -> Self {
        let count = |status: TestStatus| results.iter().filter(|r| r.status == status).count();
        let passed = count(TestStatus::Pass);
        let failed = count(TestStatus::Fail);
        let errors = count(TestStatus::Error);
        let total_duration_ms = results.iter().map(|r| r.duration_ms).sum();

        Self {
            mode,
            total: results.len(),
            passed,
            failed,
            errors,
            total_duration_ms,
            results,
        }
    }

    pub fn pass_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.passed as f64 / self.total as f64) * 100.0
        }
    }

    /// No failures and no errors
    pub fn was_successful(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }

    /// Reported identities in report order
    pub fn identities(&self) -> Vec<&str> {
        self.results.iter().map(|r| r.identity.as_str()).collect()
    }
}

impl fmt::Display for CollectSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run ({})", self.mode)?;
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        for result in &self.results {
            writeln!(f, "  {result}")?;
        }
        writeln!(f, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
        writeln!(
            f,
            "Total: {} | Pass: {} | Fail: {} | Error: {}",
            self.total, self.passed, self.failed, self.errors
        )?;
        writeln!(
            f,
            "Pass Rate: {:.1}% | Duration: {}ms",
            self.pass_rate(),
            self.total_duration_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_creation() {
        let result = TestResult::pass("mod:A.t1", 100);
        assert!(result.status.is_success());
        assert_eq!(result.duration_ms, 100);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_result_display() {
        let result = TestResult::fail("mod:A.t1", 5, "boom");
        assert_eq!(result.to_string(), "✗ mod:A.t1 [5ms] - boom");
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            TestResult::pass("mod:A.t1", 100),
            TestResult::fail("mod:A.t2", 50, "assertion failed"),
            TestResult::error("mod:B.t3", 0, "spawn failed"),
        ];

        let summary = CollectSummary::new(RunMode::Execute, results);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total_duration_ms, 150);
        assert!(!summary.was_successful());
        assert_eq!(summary.identities(), vec!["mod:A.t1", "mod:A.t2", "mod:B.t3"]);
    }

    #[test]
    fn test_empty_summary() {
        let summary = CollectSummary::new(RunMode::Collect, Vec::new());
        assert_eq!(summary.pass_rate(), 0.0);
        assert!(summary.was_successful());
    }

    #[test]
    fn test_mode_serialization() {
        let json = serde_json::to_string(&RunMode::Collect).unwrap();
        assert_eq!(json, "\"collect\"");
    }
}
