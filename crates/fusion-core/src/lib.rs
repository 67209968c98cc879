//! Fusion storage platform core types
//!
//! Wire models shared by the API client and the teardown tooling

pub mod types;

pub use types::*;
