//! Test execution engine
//!
//! Sequential execution with plugin interception, result sinks and shell
//! command bodies.

mod command;
mod runner;
mod sink;

pub use command::command_body;
pub use runner::TestRunner;
pub use sink::ResultSink;
