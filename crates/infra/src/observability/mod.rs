//! Observability for the monitoring loop
//!
//! In-process counters for reconciliation cycles, read by the status
//! command and logged by the scheduler. No exporter: the counters are
//! surfaced through `tracing` and [`metrics::CycleMetricsSnapshot`].
//!
//! All record methods return `MetricsResult<()>` so callers handle a
//! dropped metric the same way everywhere:
//!
//! ```rust
//! use agendaflow_infra::observability::metrics::CycleMetrics;
//!
//! let metrics = CycleMetrics::new();
//!
//! if let Err(e) = metrics.record_skipped() {
//!     tracing::warn!("Failed to record metric: {}", e);
//! }
//! ```

pub mod metrics;

/// Metrics error type
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    /// Empty data set - cannot calculate aggregate metric
    #[error("Empty data: cannot calculate {metric}")]
    EmptyData {
        /// Metric name that failed (e.g., "success_rate")
        metric: &'static str,
    },
}

/// Result type for metrics operations
pub type MetricsResult<T> = Result<T, MetricsError>;
