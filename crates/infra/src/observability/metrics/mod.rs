//! Metric collectors

pub mod cycle;

pub use cycle::{CycleMetrics, CycleMetricsSnapshot};
