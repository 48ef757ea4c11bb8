//! Shared utilities
//!
//! Logging setup, the observer collaborator and timing helpers.

mod logger;
mod timer;

pub use logger::{init_logger, LogLevel, Observer, TracingObserver};
pub use timer::Timer;
