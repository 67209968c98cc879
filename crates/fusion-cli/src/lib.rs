//! Fusion CLI
//!
//! Command-line tooling for the Fusion storage platform. Currently provides
//! the `teardown` command, which deletes all workloads reachable through the
//! configured API endpoint in dependency order.

pub mod cli;
pub mod commands;
