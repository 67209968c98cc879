//! CLI command implementations

mod teardown;

pub use teardown::TeardownCommand;
