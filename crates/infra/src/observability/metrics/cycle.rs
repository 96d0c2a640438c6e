//! Reconciliation cycle metrics
//!
//! Counts cycles by outcome and tracks how long the completed ones took.
//!
//! ## Design
//! - **SeqCst ordering** for the atomics used in derived metrics (average
//!   duration, success rate)
//! - **Relaxed ordering** for independent counters
//! - **No locking needed** - plain atomic counters

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use agendaflow_domain::{CycleResult, CycleStatus};
use serde::Serialize;

use crate::observability::{MetricsError, MetricsResult};

/// Counters for the monitoring loop
#[derive(Debug, Default)]
pub struct CycleMetrics {
    /// Total time spent in finished cycles, in milliseconds
    pub total_cycle_time_ms: AtomicU64,
    /// Duration of the last finished cycle, in milliseconds
    pub last_cycle_time_ms: AtomicU64,
    /// Cycles that ran to completion (including disconnected ones)
    pub completed: AtomicUsize,
    /// Cycles that found the WhatsApp link down
    pub disconnected: AtomicUsize,
    /// Cycles that failed
    pub failed: AtomicUsize,
    /// Ticks dropped because a cycle was already in flight
    pub skipped: AtomicUsize,
    /// Changes applied across all cycles
    pub changes_applied: AtomicUsize,
    /// Cooldowns entered after hitting the failure threshold
    pub backoffs: AtomicUsize,
    /// Health checks that restored the base cadence
    pub cadence_resets: AtomicUsize,
}

/// Serializable point-in-time copy of [`CycleMetrics`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleMetricsSnapshot {
    pub completed: usize,
    pub disconnected: usize,
    pub failed: usize,
    pub skipped: usize,
    pub changes_applied: usize,
    pub backoffs: usize,
    pub cadence_resets: usize,
    pub avg_cycle_time_ms: f64,
    pub last_cycle_time_ms: u64,
}

impl CycleMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of one cycle.
    pub fn record_cycle(&self, result: &CycleResult) -> MetricsResult<()> {
        let counter = match result.status {
            CycleStatus::Completed => &self.completed,
            CycleStatus::Disconnected => &self.disconnected,
            CycleStatus::Failed => &self.failed,
            CycleStatus::Skipped => return self.record_skipped(),
        };
        counter.fetch_add(1, Ordering::SeqCst);

        self.total_cycle_time_ms.fetch_add(result.duration_ms, Ordering::SeqCst);
        self.last_cycle_time_ms.store(result.duration_ms, Ordering::Relaxed);
        self.changes_applied.fetch_add(result.changes_applied, Ordering::Relaxed);
        Ok(())
    }

    pub fn record_skipped(&self) -> MetricsResult<()> {
        self.skipped.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn record_backoff(&self) -> MetricsResult<()> {
        self.backoffs.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn record_cadence_reset(&self) -> MetricsResult<()> {
        self.cadence_resets.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn finished(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
            + self.disconnected.load(Ordering::SeqCst)
            + self.failed.load(Ordering::SeqCst)
    }

    /// Average duration of finished cycles. `0.0` before the first one.
    #[allow(clippy::cast_precision_loss)]
    pub fn avg_cycle_time_ms(&self) -> f64 {
        let finished = self.finished();
        if finished == 0 {
            return 0.0;
        }
        self.total_cycle_time_ms.load(Ordering::SeqCst) as f64 / finished as f64
    }

    /// Fraction of finished cycles that did not fail.
    ///
    /// # Errors
    /// [`MetricsError::EmptyData`] before the first finished cycle.
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> MetricsResult<f64> {
        let finished = self.finished();
        if finished == 0 {
            return Err(MetricsError::EmptyData { metric: "success_rate" });
        }
        let failed = self.failed.load(Ordering::SeqCst);
        Ok((finished - failed) as f64 / finished as f64)
    }

    pub fn snapshot(&self) -> CycleMetricsSnapshot {
        CycleMetricsSnapshot {
            completed: self.completed.load(Ordering::SeqCst),
            disconnected: self.disconnected.load(Ordering::SeqCst),
            failed: self.failed.load(Ordering::SeqCst),
            skipped: self.skipped.load(Ordering::Relaxed),
            changes_applied: self.changes_applied.load(Ordering::Relaxed),
            backoffs: self.backoffs.load(Ordering::Relaxed),
            cadence_resets: self.cadence_resets.load(Ordering::Relaxed),
            avg_cycle_time_ms: self.avg_cycle_time_ms(),
            last_cycle_time_ms: self.last_cycle_time_ms.load(Ordering::Relaxed),
        }
    }
}
