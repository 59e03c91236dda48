//! DhammaShell CLI - research telemetry and compliance audit orchestrator
//!
//! This crate provides the `dhamma` binary and command orchestration.

pub mod commands;
pub mod config;
pub mod context;

pub use config::{AppConfig, ConfigSettings};
pub use context::AppContext;
