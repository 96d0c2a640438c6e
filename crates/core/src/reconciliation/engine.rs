use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use agendaflow_common::SharedClock;
use agendaflow_domain::constants::{
    MSG_MONITORING, MSG_MONITORING_PAUSED, MSG_WHATSAPP_DISCONNECTED,
};
use agendaflow_domain::{
    AgendaError, ChangeRecord, ChangeSummary, Config, CycleResult, CycleStatus, EngineStatus,
    MonitoringStatus, Result,
};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, warn};

use super::backoff::{BackoffDecision, BackoffPolicy};
use super::ledger::ChangeLedger;
use crate::changes::ChangeFetcher;
use crate::connectivity::ConnectivityGate;
use crate::ports::{ChangeFeed, ConnectivityProbe, MeetingRepository, Notifier, StatusIndicator};
use crate::store::MeetingStateStore;
use crate::ui_sync::{DetailViewTracker, UiSyncTarget};

/// Everything the engine talks to.
#[derive(Clone)]
pub struct EnginePorts {
    pub connectivity: Arc<dyn ConnectivityProbe>,
    pub changes: Arc<dyn ChangeFeed>,
    pub meetings: Arc<dyn MeetingRepository>,
    pub store: Arc<MeetingStateStore>,
    pub ui: Arc<dyn UiSyncTarget>,
    pub indicator: Arc<dyn StatusIndicator>,
    pub notifier: Arc<dyn Notifier>,
    pub tracker: DetailViewTracker,
    pub clock: SharedClock,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub base_interval: Duration,
    pub lookback: Duration,
    pub connectivity_timeout: Duration,
    pub policy: BackoffPolicy,
}

impl EngineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_interval: config.monitoring.base_interval(),
            lookback: config.monitoring.lookback(),
            connectivity_timeout: config.backend.connectivity_timeout(),
            policy: BackoffPolicy::from_config(&config.monitoring),
        }
    }
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Result of [`ReconciliationEngine::run_cycle`].
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutcome {
    pub result: CycleResult,
    /// Set on the failure that reaches the threshold; the scheduler must
    /// pause for `cooldown` and then call
    /// [`ReconciliationEngine::resume_after_backoff`].
    pub backoff: Option<BackoffDecision>,
}

enum CycleStep {
    Disconnected,
    Completed { applied: usize },
}

#[derive(Debug)]
struct EngineState {
    consecutive_failures: u32,
    current_interval: Duration,
    cooling_down: bool,
    started_at: Option<DateTime<Utc>>,
    started_instant: Option<Instant>,
    last_success: Option<DateTime<Utc>>,
    last_cycle: Option<CycleResult>,
}

/// Clears the in-flight flag on every exit path, including a dropped future.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Single-flight polling cycle plus failure and cadence bookkeeping.
///
/// Background errors never leave the engine: they are logged, counted and
/// shown on the monitoring indicator.
pub struct ReconciliationEngine {
    ports: EnginePorts,
    gate: ConnectivityGate,
    fetcher: ChangeFetcher,
    settings: EngineSettings,
    in_flight: AtomicBool,
    running: AtomicBool,
    state: Mutex<EngineState>,
    ledger: Mutex<ChangeLedger>,
}

impl ReconciliationEngine {
    pub fn new(ports: EnginePorts, settings: EngineSettings) -> Self {
        let gate = ConnectivityGate::new(
            Arc::clone(&ports.connectivity),
            Arc::clone(&ports.indicator),
            settings.connectivity_timeout,
        );
        let fetcher = ChangeFetcher::new(
            Arc::clone(&ports.changes),
            Arc::clone(&ports.clock),
            settings.lookback,
        );
        let state = EngineState {
            consecutive_failures: 0,
            current_interval: settings.base_interval,
            cooling_down: false,
            started_at: None,
            started_instant: None,
            last_success: None,
            last_cycle: None,
        };

        Self {
            ports,
            gate,
            fetcher,
            settings,
            in_flight: AtomicBool::new(false),
            running: AtomicBool::new(false),
            state: Mutex::new(state),
            ledger: Mutex::new(ChangeLedger::default()),
        }
    }

    /// Run one reconciliation cycle.
    ///
    /// Returns immediately with [`CycleStatus::Skipped`] when another cycle
    /// is still in flight.
    #[instrument(skip(self))]
    pub async fn run_cycle(&self) -> CycleOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("cycle already in flight; skipping");
            return CycleOutcome {
                result: CycleResult::skipped(self.ports.clock.utc_now()),
                backoff: None,
            };
        };

        let started = self.ports.clock.now();
        let step = self.execute_cycle().await;
        let elapsed = self.ports.clock.now().saturating_duration_since(started);

        self.finish_cycle(step, elapsed)
    }

    async fn execute_cycle(&self) -> Result<CycleStep> {
        let connectivity = self.gate.check_linked().await;
        if !connectivity.linked {
            debug!(message = %connectivity.message, "whatsapp not linked; skipping fetch");
            return Ok(CycleStep::Disconnected);
        }

        let fetch = self.fetcher.fetch_changes().await;
        if let Some(err) = fetch.error {
            return Err(err);
        }

        let fresh = {
            let mut ledger = self.ledger.lock();
            ledger.prune_before(fetch.since);
            ledger.fresh(fetch.changes)
        };
        if fresh.is_empty() {
            return Ok(CycleStep::Completed { applied: 0 });
        }

        let reload = self.ports.store.reload(self.ports.meetings.as_ref()).await?;
        debug!(outcome = ?reload, changes = fresh.len(), "meetings reloaded after change");

        let applied = self.sync_changes(&fresh).await;
        if let Some(notification) = ChangeSummary::from_changes(&applied).to_notification() {
            self.ports.notifier.notify(&notification);
        }

        Ok(CycleStep::Completed { applied: applied.len() })
    }

    /// Apply each change and refresh the UI. A change whose meeting is
    /// missing from the reloaded list is skipped; the rest still apply.
    async fn sync_changes(&self, changes: &[ChangeRecord]) -> Vec<ChangeRecord> {
        let mut applied = Vec::with_capacity(changes.len());

        for change in changes {
            let outcome = self.ports.store.apply_change(change);

            match self.ports.store.get(change.meeting_id) {
                Some(meeting) => {
                    let refresh = self.ports.ui.refresh(change.meeting_id, &meeting).await;
                    debug!(
                        meeting_id = %change.meeting_id,
                        status = %change.new_status,
                        store = ?outcome,
                        ui = ?refresh,
                        "change synced"
                    );
                    applied.push(change.clone());
                }
                None => {
                    warn!(meeting_id = %change.meeting_id, "changed meeting missing after reload");
                }
            }

            self.ledger.lock().record(change);
        }

        applied
    }

    fn finish_cycle(&self, step: Result<CycleStep>, elapsed: Duration) -> CycleOutcome {
        let now = self.ports.clock.utc_now();
        let duration_ms = millis(elapsed);
        let mut backoff = None;

        let (result, monitoring) = {
            let mut state = self.state.lock();

            let (result, monitoring) = match step {
                Ok(CycleStep::Disconnected) => (
                    cycle_result(CycleStatus::Disconnected, duration_ms, 0, None, now),
                    Some(MonitoringStatus {
                        active: false,
                        activity_count: 0,
                        message: MSG_WHATSAPP_DISCONNECTED.to_string(),
                    }),
                ),
                Ok(CycleStep::Completed { applied }) => {
                    state.consecutive_failures = 0;
                    state.last_success = Some(now);
                    let message = if applied > 0 {
                        format!("{applied} resposta(s) processada(s)")
                    } else {
                        MSG_MONITORING.to_string()
                    };
                    (
                        cycle_result(CycleStatus::Completed, duration_ms, applied, None, now),
                        Some(MonitoringStatus { active: true, activity_count: applied, message }),
                    )
                }
                Err(err) => {
                    state.consecutive_failures = state.consecutive_failures.saturating_add(1);
                    error!(
                        error = %err,
                        consecutive_failures = state.consecutive_failures,
                        "reconciliation cycle failed"
                    );

                    let mut monitoring = None;
                    if self.settings.policy.should_pause(state.consecutive_failures)
                        && !state.cooling_down
                    {
                        state.cooling_down = true;
                        let decision = self.settings.policy.decide(state.current_interval);
                        warn!(
                            cooldown_ms = millis(decision.cooldown),
                            next_interval_ms = millis(decision.next_interval),
                            "failure threshold reached; pausing monitoring"
                        );
                        backoff = Some(decision);
                        monitoring = Some(MonitoringStatus {
                            active: false,
                            activity_count: 0,
                            message: MSG_MONITORING_PAUSED.to_string(),
                        });
                    }
                    (
                        cycle_result(CycleStatus::Failed, duration_ms, 0, Some(err), now),
                        monitoring,
                    )
                }
            };

            state.last_cycle = Some(result.clone());
            (result, monitoring)
        };

        if let Some(monitoring) = monitoring {
            self.ports.indicator.show_monitoring(&monitoring);
        }
        info!(
            status = %result.status,
            duration_ms = result.duration_ms,
            changes_applied = result.changes_applied,
            "reconciliation cycle finished"
        );

        CycleOutcome { result, backoff }
    }

    /// Reset the failure counter and run a cycle now. Still single-flight.
    ///
    /// A forced cycle never pauses monitoring: a pending cooldown is
    /// cancelled first, and a threshold reached by the forced cycle itself
    /// yields no backoff decision.
    #[instrument(skip(self))]
    pub async fn force_update(&self) -> CycleOutcome {
        self.cancel_backoff();
        self.state.lock().consecutive_failures = 0;
        info!("forced reconciliation requested");

        let mut outcome = self.run_cycle().await;
        if outcome.backoff.take().is_some() {
            self.cancel_backoff();
        }
        outcome
    }

    /// End of a cooldown: grow the interval and clear the failure counter.
    /// Returns the interval to resume with. The interval is kept when the
    /// cooldown was already cancelled.
    pub fn resume_after_backoff(&self) -> Duration {
        let mut state = self.state.lock();
        if !state.cooling_down {
            debug!("cooldown already cancelled; interval kept");
            return state.current_interval;
        }
        state.current_interval = self.settings.policy.next_interval(state.current_interval);
        state.consecutive_failures = 0;
        state.cooling_down = false;
        info!(interval_ms = millis(state.current_interval), "monitoring resumed after cooldown");
        state.current_interval
    }

    /// Abandon a pending cooldown without growing the interval, clearing
    /// the failure counter. Returns `true` if a cooldown was pending.
    ///
    /// Called whenever nobody will call [`Self::resume_after_backoff`] for
    /// the decision: the scheduler stopped mid-cooldown, or a forced cycle
    /// ran instead.
    pub fn cancel_backoff(&self) -> bool {
        let mut state = self.state.lock();
        if !state.cooling_down {
            return false;
        }
        state.cooling_down = false;
        state.consecutive_failures = 0;
        info!(interval_ms = millis(state.current_interval), "pending cooldown cancelled");
        true
    }

    /// Drop back to the base interval. Returns `true` if the cadence changed.
    pub fn reset_cadence(&self) -> bool {
        let mut state = self.state.lock();
        if state.current_interval <= self.settings.base_interval {
            return false;
        }
        info!(
            from_ms = millis(state.current_interval),
            to_ms = millis(self.settings.base_interval),
            "cadence reset to base interval"
        );
        state.current_interval = self.settings.base_interval;
        true
    }

    /// Probe connectivity out of band and restore the base cadence when the
    /// backend answers. Returns `true` if the cadence was reset.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> bool {
        let status = self.gate.check_linked().await;
        if !status.reachable {
            debug!("health check: backend unreachable; cadence kept");
            return false;
        }
        self.reset_cadence()
    }

    /// Mark the engine as driven by a scheduler (or not). Either transition
    /// drops a cooldown left over from the previous run.
    pub fn set_running(&self, running: bool) {
        self.cancel_backoff();
        self.running.store(running, Ordering::SeqCst);
        let mut state = self.state.lock();
        if running {
            state.started_at = Some(self.ports.clock.utc_now());
            state.started_instant = Some(self.ports.clock.now());
        } else {
            state.started_at = None;
            state.started_instant = None;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_cycle_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn current_interval(&self) -> Duration {
        self.state.lock().current_interval
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.state.lock().consecutive_failures
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn store(&self) -> &Arc<MeetingStateStore> {
        &self.ports.store
    }

    pub fn status(&self) -> EngineStatus {
        let state = self.state.lock();
        let uptime_ms = state
            .started_instant
            .map_or(0, |started| millis(self.ports.clock.now().saturating_duration_since(started)));

        EngineStatus {
            is_running: self.is_running(),
            is_cycle_in_flight: self.is_cycle_in_flight(),
            is_cooling_down: state.cooling_down,
            consecutive_failures: state.consecutive_failures,
            base_interval_ms: millis(self.settings.base_interval),
            current_interval_ms: millis(state.current_interval),
            started_at: state.started_at,
            uptime_ms,
            last_successful_cycle_at: state.last_success,
            last_cycle: state.last_cycle.clone(),
            active_detail_meeting_id: self.ports.tracker.active(),
        }
    }
}

fn cycle_result(
    status: CycleStatus,
    duration_ms: u64,
    changes_applied: usize,
    error: Option<AgendaError>,
    finished_at: DateTime<Utc>,
) -> CycleResult {
    CycleResult {
        status,
        duration_ms,
        changes_applied,
        error: error.map(|err| err.to_string()),
        finished_at,
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
