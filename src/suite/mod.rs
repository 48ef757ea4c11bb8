//! Test discovery and suite assembly

mod builder;
mod loader;
mod manifest;

pub use builder::CollectSuiteFactory;
pub use loader::TestLoader;
pub use manifest::Manifest;
