//! Result reporting
//!
//! A [`ResultSink`] receives the notifications of every reported case. The
//! [`ResultCollector`] turns them into [`TestResult`]s and rejects sequences
//! that break the start → outcome → stop order.

use anyhow::Result;
use thiserror::Error;
use tracing::debug;

use crate::models::{Case, CollectSummary, RunMode, TestResult};
use crate::utils::Timer;

/// Receiver of per-case result notifications
pub trait ResultSink {
    fn start_test(&mut self, case: &Case) -> Result<()>;
    fn add_success(&mut self, case: &Case) -> Result<()>;
    fn add_failure(&mut self, case: &Case, message: &str) -> Result<()>;
    fn add_error(&mut self, case: &Case, message: &str) -> Result<()>;
    fn stop_test(&mut self, case: &Case) -> Result<()>;
}

/// Out-of-order notifications
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SinkError {
    #[error("{next} started while {running} is still running")]
    AlreadyStarted { running: String, next: String },

    #[error("{0} reported without start_test")]
    NotStarted(String),

    #[error("{0} already has an outcome")]
    DuplicateOutcome(String),

    #[error("{0} stopped without an outcome")]
    NoOutcome(String),
}

enum Outcome {
    Pass,
    Fail(String),
    Error(String),
}

struct Pending {
    identity: String,
    timer: Timer,
    outcome: Option<Outcome>,
}

/// Sink that records results in report order
#[derive(Default)]
pub struct ResultCollector {
    current: Option<Pending>,
    results: Vec<TestResult>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_summary(self, mode: RunMode) -> CollectSummary {
        CollectSummary::new(mode, self.results)
    }

    fn pending(&mut self, case: &Case) -> Result<&mut Pending, SinkError> {
        self.current
            .as_mut()
            .ok_or_else(|| SinkError::NotStarted(case.id()))
    }

    fn record(
        &mut self,
        case: &Case,
        outcome: Outcome,
    ) -> Result<(), SinkError> {
        let pending = self.pending(case)?;
        if pending.outcome.is_some() {
            return Err(SinkError::DuplicateOutcome(pending.identity.clone()));
        }
        pending.outcome = Some(outcome);
        Ok(())
    }
}

impl ResultSink for ResultCollector {
    fn start_test(&mut self, case: &Case) -> Result<()> {
        let identity = case.description();
        if let Some(running) = &self.current {
            return Err(SinkError::AlreadyStarted {
                running: running.identity.clone(),
                next: identity,
            }
            .into());
        }

        self.current = Some(Pending {
            timer: Timer::start(identity.clone()),
            identity,
            outcome: None,
        });
        Ok(())
    }

    fn add_success(&mut self, case: &Case) -> Result<()> {
        Ok(self.record(case, Outcome::Pass)?)
    }

    fn add_failure(&mut self, case: &Case, message: &str) -> Result<()> {
        Ok(self.record(case, Outcome::Fail(message.to_string()))?)
    }

    fn add_error(&mut self, case: &Case, message: &str) -> Result<()> {
        Ok(self.record(case, Outcome::Error(message.to_string()))?)
    }

    fn stop_test(&mut self, case: &Case) -> Result<()> {
        let pending = self
            .current
            .take()
            .ok_or_else(|| SinkError::NotStarted(case.id()))?;
        let Some(outcome) = pending.outcome else {
            return Err(SinkError::NoOutcome(pending.identity).into());
        };

        let duration_ms = pending.timer.stop();
        let result = match outcome {
            Outcome::Pass => TestResult::pass(pending.identity, duration_ms),
            Outcome::Fail(message) => TestResult::fail(pending.identity, duration_ms, message),
            Outcome::Error(message) => TestResult::error(pending.identity, duration_ms, message),
        };
        debug!("  {}", result);
        self.results.push(result);
        Ok(())
    }
}
