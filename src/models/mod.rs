//! Data models for test collection
//!
//! Test trees on the discovery side, results and summaries on the reporting side.

mod test_node;
mod test_result;

pub use test_node::{Case, Fixtures, LazySuiteSource, Suite, TestNode};
pub use test_result::{CollectSummary, RunMode, TestResult, TestStatus};
