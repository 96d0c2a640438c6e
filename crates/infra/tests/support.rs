use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use agendaflow_common::testing::MockClock;
use agendaflow_common::SharedClock;
use agendaflow_core::{
    ChangeFeed, CompositeUiSync, ConnectivityProbe, DetailSyncTarget, DetailViewTracker,
    EnginePorts, EngineSettings, ListSyncTarget, MeetingRepository, MeetingStateStore,
    ReconciliationEngine,
};
use agendaflow_domain::{
    AgendaError, ChangeRecord, ClientResponse, ConfirmationStatus, Config, ConnectivityStatus,
    Meeting, MeetingId, Result,
};
use agendaflow_infra::ui::{IndicatorState, InMemoryDetailView, InMemoryListView, QueuedNotifier};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// In-process backend whose answers are scripted by the test.
///
/// Scripted change batches are served once each, in order; afterwards the
/// feed is empty. Failures injected with [`ScriptedBackend::fail_changes`]
/// take precedence.
#[derive(Default)]
pub struct ScriptedBackend {
    linked: Mutex<Option<bool>>,
    meetings: Mutex<Vec<Meeting>>,
    change_batches: Mutex<VecDeque<Vec<ChangeRecord>>>,
    change_failures: AtomicUsize,
    pub connectivity_calls: AtomicUsize,
    pub change_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn linked() -> Arc<Self> {
        let backend = Self::default();
        *backend.linked.lock() = Some(true);
        Arc::new(backend)
    }

    pub fn set_linked(&self, linked: Option<bool>) {
        *self.linked.lock() = linked;
    }

    pub fn set_meetings(&self, meetings: Vec<Meeting>) {
        *self.meetings.lock() = meetings;
    }

    /// Queue one batch for the next change-feed call; statuses are also
    /// written to the meeting list the way the backend would.
    pub fn push_changes(&self, changes: Vec<ChangeRecord>) {
        {
            let mut meetings = self.meetings.lock();
            for change in &changes {
                if let Some(meeting) = meetings.iter_mut().find(|m| m.id == change.meeting_id) {
                    meeting.confirmation_status = change.new_status;
                    meeting.status_updated_at = Some(change.updated_at);
                }
            }
        }
        self.change_batches.lock().push_back(changes);
    }

    /// Make the next `count` change-feed calls fail.
    pub fn fail_changes(&self, count: usize) {
        self.change_failures.store(count, Ordering::SeqCst);
    }

    pub fn change_calls(&self) -> usize {
        self.change_calls.load(Ordering::SeqCst)
    }

    pub fn connectivity_calls(&self) -> usize {
        self.connectivity_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectivityProbe for ScriptedBackend {
    async fn connectivity_status(&self) -> Result<ConnectivityStatus> {
        self.connectivity_calls.fetch_add(1, Ordering::SeqCst);
        match *self.linked.lock() {
            Some(true) => Ok(ConnectivityStatus::linked("WhatsApp conectado")),
            Some(false) => Ok(ConnectivityStatus::unlinked("WhatsApp desconectado")),
            None => Err(AgendaError::Network("backend unreachable".into())),
        }
    }
}

#[async_trait]
impl ChangeFeed for ScriptedBackend {
    async fn changes_since(&self, _since: DateTime<Utc>) -> Result<Vec<ChangeRecord>> {
        self.change_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.change_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.change_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(AgendaError::Network("change feed unavailable".into()));
        }
        Ok(self.change_batches.lock().pop_front().unwrap_or_default())
    }
}

#[async_trait]
impl MeetingRepository for ScriptedBackend {
    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.meetings.lock().clone())
    }

    async fn get_meeting(&self, id: MeetingId) -> Result<Meeting> {
        self.meetings
            .lock()
            .iter()
            .find(|meeting| meeting.id == id)
            .cloned()
            .ok_or_else(|| AgendaError::NotFound(format!("meeting {id}")))
    }

    async fn list_responses(&self, _id: MeetingId) -> Result<Vec<ClientResponse>> {
        Ok(Vec::new())
    }

    async fn set_confirmation_status(
        &self,
        id: MeetingId,
        status: ConfirmationStatus,
    ) -> Result<()> {
        let mut meetings = self.meetings.lock();
        let meeting = meetings
            .iter_mut()
            .find(|meeting| meeting.id == id)
            .ok_or_else(|| AgendaError::NotFound(format!("meeting {id}")))?;
        meeting.confirmation_status = status;
        Ok(())
    }
}

/// Engine wired to a scripted backend and the in-memory UI adapters.
pub struct EngineHarness {
    pub backend: Arc<ScriptedBackend>,
    pub engine: Arc<ReconciliationEngine>,
    pub list: Arc<InMemoryListView>,
    pub detail: Arc<InMemoryDetailView>,
    pub indicator: Arc<IndicatorState>,
    pub notifier: Arc<QueuedNotifier>,
    pub tracker: DetailViewTracker,
    pub clock: MockClock,
}

impl EngineHarness {
    pub fn new(backend: Arc<ScriptedBackend>, config: &Config) -> Self {
        let clock = MockClock::new();
        let shared_clock: SharedClock = Arc::new(clock.clone());
        let store = Arc::new(MeetingStateStore::new());
        let list = Arc::new(InMemoryListView::new());
        let detail = Arc::new(InMemoryDetailView::new());
        let indicator = Arc::new(IndicatorState::new());
        let notifier = Arc::new(QueuedNotifier::default());
        let tracker = DetailViewTracker::new();

        let ui = CompositeUiSync::new()
            .with_target(Arc::new(ListSyncTarget::new(list.clone(), config.monitoring.highlight())))
            .with_target(Arc::new(DetailSyncTarget::new(
                detail.clone(),
                tracker.clone(),
                backend.clone(),
            )));

        let ports = EnginePorts {
            connectivity: backend.clone(),
            changes: backend.clone(),
            meetings: backend.clone(),
            store,
            ui: Arc::new(ui),
            indicator: indicator.clone(),
            notifier: notifier.clone(),
            tracker: tracker.clone(),
            clock: shared_clock,
        };
        let engine = Arc::new(ReconciliationEngine::new(ports, EngineSettings::from_config(config)));

        Self { backend, engine, list, detail, indicator, notifier, tracker, clock }
    }
}

/// Config with short, round timings for paused-time tests.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.monitoring.initial_delay_ms = 100;
    config.monitoring.base_interval_ms = 1_000;
    config.monitoring.failure_threshold = 2;
    config.monitoring.cooldown_ms = 5_000;
    config.monitoring.backoff_factor = 2.0;
    config.monitoring.max_interval_ms = 8_000;
    config.monitoring.health_check_interval_ms = 60_000;
    config.backend.connectivity_timeout_ms = 500;
    config
}

pub fn meeting(id: i64, status: ConfirmationStatus) -> Meeting {
    Meeting::new(MeetingId(id), Utc::now()).with_status(status)
}

pub fn change(id: i64, status: ConfirmationStatus) -> ChangeRecord {
    ChangeRecord::new(MeetingId(id), status, Utc::now())
}

/// Give spawned tasks a chance to run at the current (paused) instant.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

pub const TICK: Duration = Duration::from_millis(1);
