//! Monitoring scheduler
//!
//! Drives the reconciliation engine on two background tasks:
//! - the cycle loop: first cycle after `initial_delay`, then one cycle per
//!   `current_interval`, with a cooldown sleep whenever the engine reports a
//!   backoff decision
//! - the health loop: every `health_check_interval` probes the backend and,
//!   when the cadence was reset, wakes the cycle loop so the base interval
//!   applies immediately
//!
//! `start` while running is a no-op with a warning. `stop` is idempotent; it
//! cancels future ticks but lets an in-flight cycle finish.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use agendaflow_core::ReconciliationEngine;
//! use agendaflow_infra::observability::metrics::CycleMetrics;
//! use agendaflow_infra::scheduling::{MonitoringScheduler, MonitoringSchedulerConfig};
//!
//! # async fn example(engine: Arc<ReconciliationEngine>) -> Result<(), Box<dyn std::error::Error>> {
//! let scheduler = MonitoringScheduler::new(
//!     engine,
//!     MonitoringSchedulerConfig::default(),
//!     Arc::new(CycleMetrics::new()),
//! );
//!
//! scheduler.start().await?;
//! // ... view session runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use agendaflow_core::{CycleOutcome, ReconciliationEngine};
use agendaflow_domain::MonitoringConfig;
use parking_lot::Mutex as SyncMutex;
use tokio::sync::{Mutex, Notify};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::observability::metrics::CycleMetrics;
use crate::observability::MetricsResult;
use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Type alias for task handle to avoid complexity warnings
type TaskHandle = Arc<Mutex<Option<JoinHandle<()>>>>;

/// Configuration for the monitoring scheduler
#[derive(Debug, Clone)]
pub struct MonitoringSchedulerConfig {
    /// Delay before the first cycle
    pub initial_delay: Duration,
    /// Period of the out-of-band health check
    pub health_check_interval: Duration,
    /// How long `stop` waits for each task to wind down
    pub stop_timeout: Duration,
}

impl Default for MonitoringSchedulerConfig {
    fn default() -> Self {
        Self::from_config(&MonitoringConfig::default())
    }
}

impl MonitoringSchedulerConfig {
    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self {
            initial_delay: config.initial_delay(),
            health_check_interval: config.health_check_interval(),
            stop_timeout: Duration::from_secs(30),
        }
    }
}

/// Shared state handed to the background loops
struct LoopContext {
    engine: Arc<ReconciliationEngine>,
    metrics: Arc<CycleMetrics>,
    wake: Arc<Notify>,
    cancel: CancellationToken,
}

/// Timer driver for a [`ReconciliationEngine`]
pub struct MonitoringScheduler {
    engine: Arc<ReconciliationEngine>,
    config: MonitoringSchedulerConfig,
    metrics: Arc<CycleMetrics>,
    cancellation_token: SyncMutex<CancellationToken>,
    wake: Arc<Notify>,
    cycle_task: TaskHandle,
    health_task: TaskHandle,
}

impl MonitoringScheduler {
    pub fn new(
        engine: Arc<ReconciliationEngine>,
        config: MonitoringSchedulerConfig,
        metrics: Arc<CycleMetrics>,
    ) -> Self {
        Self {
            engine,
            config,
            metrics,
            cancellation_token: SyncMutex::new(CancellationToken::new()),
            wake: Arc::new(Notify::new()),
            cycle_task: Arc::new(Mutex::new(None)),
            health_task: Arc::new(Mutex::new(None)),
        }
    }

    /// Start the cycle and health loops.
    ///
    /// Calling this while already running logs a warning and changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Currently infallible; kept fallible for parity with [`Self::stop`].
    #[instrument(skip(self))]
    pub async fn start(&self) -> SchedulerResult<()> {
        let mut cycle_slot = self.cycle_task.lock().await;
        if cycle_slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            warn!("Monitoring scheduler already running; start ignored");
            return Ok(());
        }

        info!(
            initial_delay_ms = self.config.initial_delay.as_millis(),
            interval_ms = self.engine.current_interval().as_millis(),
            "Starting monitoring scheduler"
        );

        // Fresh token so the scheduler can restart after stop
        let cancel = CancellationToken::new();
        *self.cancellation_token.lock() = cancel.clone();
        self.engine.set_running(true);

        let cycle_context = self.loop_context(cancel.clone());
        let initial_delay = self.config.initial_delay;
        *cycle_slot = Some(tokio::spawn(async move {
            Self::cycle_loop(cycle_context, initial_delay).await;
        }));

        let health_context = self.loop_context(cancel);
        let health_interval = self.config.health_check_interval;
        *self.health_task.lock().await = Some(tokio::spawn(async move {
            Self::health_loop(health_context, health_interval).await;
        }));

        info!("Monitoring scheduler started");
        Ok(())
    }

    /// Stop both loops. An in-flight cycle runs to completion first.
    ///
    /// Safe to call when already stopped.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::Timeout`] if a task does not wind down within
    /// `stop_timeout`, [`SchedulerError::TaskJoinFailed`] if it panicked.
    #[instrument(skip(self))]
    pub async fn stop(&self) -> SchedulerResult<()> {
        self.cancellation_token.lock().cancel();

        let cycle = self.cycle_task.lock().await.take();
        let health = self.health_task.lock().await.take();
        let was_running = self.engine.is_running();
        self.engine.set_running(false);

        if cycle.is_none() && health.is_none() {
            debug!("Monitoring scheduler already stopped");
            return Ok(());
        }

        info!(was_running, "Stopping monitoring scheduler");

        for handle in [cycle, health].into_iter().flatten() {
            let join_timeout = self.config.stop_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|source| SchedulerError::Timeout { duration: join_timeout, source })??;
        }

        info!("Monitoring scheduler stopped");
        Ok(())
    }

    /// Check if the cycle loop is alive
    pub fn is_running(&self) -> bool {
        self.cycle_task
            .try_lock()
            .ok()
            .and_then(|guard| guard.as_ref().map(|h| !h.is_finished()))
            .unwrap_or(false)
    }

    /// Reset failures and run a cycle now, then restart the cadence timer.
    ///
    /// # Errors
    ///
    /// [`SchedulerError::EngineUnavailable`] when the scheduler is stopped.
    #[instrument(skip(self))]
    pub async fn force_update(&self) -> SchedulerResult<CycleOutcome> {
        if !self.is_running() {
            return Err(SchedulerError::EngineUnavailable(
                "monitoring is not running; start it before forcing an update".into(),
            ));
        }

        let outcome = self.engine.force_update().await;
        log_metric(self.metrics.record_cycle(&outcome.result), "scheduler.cycle.forced");
        self.wake.notify_one();
        Ok(outcome)
    }

    pub fn metrics(&self) -> &Arc<CycleMetrics> {
        &self.metrics
    }

    fn loop_context(&self, cancel: CancellationToken) -> LoopContext {
        LoopContext {
            engine: Arc::clone(&self.engine),
            metrics: Arc::clone(&self.metrics),
            wake: Arc::clone(&self.wake),
            cancel,
        }
    }

    /// Background cycle loop
    async fn cycle_loop(context: LoopContext, initial_delay: Duration) {
        let LoopContext { engine, metrics, wake, cancel } = context;

        if !sleep_unless_cancelled(&cancel, initial_delay).await {
            debug!("Cycle loop cancelled before first cycle");
            return;
        }

        loop {
            let outcome = engine.run_cycle().await;
            log_metric(metrics.record_cycle(&outcome.result), "scheduler.cycle");

            if let Some(decision) = outcome.backoff {
                log_metric(metrics.record_backoff(), "scheduler.backoff");
                info!(
                    cooldown_ms = decision.cooldown.as_millis(),
                    next_interval_ms = decision.next_interval.as_millis(),
                    "Monitoring paused after repeated failures"
                );
                if !sleep_unless_cancelled(&cancel, decision.cooldown).await {
                    engine.cancel_backoff();
                    debug!("Cycle loop cancelled during cooldown");
                    return;
                }
                engine.resume_after_backoff();
            }

            // A wake re-arms the timer with whatever the cadence is now
            loop {
                let interval = engine.current_interval();
                tokio::select! {
                    () = cancel.cancelled() => {
                        debug!("Cycle loop cancelled");
                        return;
                    }
                    () = wake.notified() => {
                        debug!(interval_ms = interval.as_millis(), "Cycle timer re-armed");
                    }
                    () = tokio::time::sleep(interval) => break,
                }
            }
        }
    }

    /// Background health-check loop
    async fn health_loop(context: LoopContext, interval: Duration) {
        let LoopContext { engine, metrics, wake, cancel } = context;

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!("Health loop cancelled");
                    break;
                }
                () = tokio::time::sleep(interval) => {
                    if engine.health_check().await {
                        log_metric(metrics.record_cadence_reset(), "scheduler.cadence_reset");
                        wake.notify_one();
                    }
                }
            }
        }
    }
}

impl Drop for MonitoringScheduler {
    fn drop(&mut self) {
        let token = self.cancellation_token.get_mut().clone();
        if !token.is_cancelled() && self.is_running() {
            warn!("MonitoringScheduler dropped while running; cancelling background tasks");
        }
        token.cancel();
    }
}

/// Sleep for `duration`. Returns `false` if cancelled first.
async fn sleep_unless_cancelled(cancel: &CancellationToken, duration: Duration) -> bool {
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(duration) => true,
    }
}

fn log_metric(result: MetricsResult<()>, metric: &'static str) {
    if let Err(err) = result {
        warn!(metric, error = %err, "Failed to record monitoring metric");
    }
}
