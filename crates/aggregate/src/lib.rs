//! DhammaShell Aggregator
//!
//! Read-only statistics over recorded sessions: per-metric count, mean, min, max,
//! chronological trend and its least-squares slope. Also renders the research report.

pub mod error;
pub mod report;
pub mod stats;

pub use error::AggregateError;
pub use report::{describe_metric, MetricDescription, ResearchReport};
pub use stats::{AggregateStats, Aggregator, MetricStats};
