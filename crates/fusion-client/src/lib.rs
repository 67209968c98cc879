//! Fusion REST API client
//!
//! Configuration loading, the typed API client and the asynchronous
//! operation poller for the Fusion storage platform control plane.

pub mod client;
pub mod config;
pub mod operations;

pub use client::{ApiError, FusionApi, HttpFusionClient};
pub use config::{ConfigError, FusionConfig, PollSettings};
pub use operations::{wait_operation_succeeded, OperationError};
