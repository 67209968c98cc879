//! Fusion workload teardown
//!
//! Deletes storage platform resources in dependency order, blocking on each
//! asynchronous operation before issuing the next call.

pub mod orchestrator;


pub use orchestrator::{teardown_workloads, TeardownError};
