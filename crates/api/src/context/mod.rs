//! Dashboard context - dependency injection container
//!
//! One [`DashboardContext`] per view session. It owns the engine, the
//! scheduler and the view models; the hosting page calls
//! [`DashboardContext::dispose`] when the session ends.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use agendaflow_common::{SharedClock, SystemClock};
use agendaflow_core::{
    ChangeFeed, CompositeUiSync, ConnectivityProbe, DetailSyncTarget, DetailView,
    DetailViewTracker, EnginePorts, EngineSettings, ListSyncTarget, MeetingActions,
    MeetingRepository, MeetingStateStore, ReconciliationEngine, StatusIndicator, UiSyncTarget,
};
use agendaflow_domain::constants::{MSG_MONITORING, MSG_MONITORING_STOPPED};
use agendaflow_domain::{
    AgendaError, Config, ConfirmationStatus, ConnectivityStatus, CycleResult, EngineStatus,
    Meeting, MeetingId, MonitoringStatus, Notification, Result,
};
use agendaflow_infra::observability::metrics::{CycleMetrics, CycleMetricsSnapshot};
use agendaflow_infra::ui::{
    DetailSnapshot, IndicatorState, InMemoryDetailView, InMemoryListView, QueuedNotifier,
};
use agendaflow_infra::{HttpBackend, MonitoringScheduler, MonitoringSchedulerConfig};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Type alias for meeting repository port trait object
type DynMeetingRepository = dyn MeetingRepository + 'static;

/// Everything the status panel shows in one read.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardStatus {
    pub engine: EngineStatus,
    pub metrics: CycleMetricsSnapshot,
    pub connection: Option<ConnectivityStatus>,
    pub monitoring: Option<MonitoringStatus>,
    pub meetings_loaded: usize,
}

/// Dashboard context - holds all services and view state of a session
pub struct DashboardContext {
    pub config: Config,
    pub store: Arc<MeetingStateStore>,
    pub engine: Arc<ReconciliationEngine>,
    pub scheduler: Arc<MonitoringScheduler>,
    pub actions: Arc<MeetingActions>,
    pub metrics: Arc<CycleMetrics>,

    // View models and widgets
    pub list_view: Arc<InMemoryListView>,
    pub detail_view: Arc<InMemoryDetailView>,
    pub tracker: DetailViewTracker,
    pub indicator: Arc<IndicatorState>,
    pub notifier: Arc<QueuedNotifier>,

    meetings: Arc<DynMeetingRepository>,
    disposed: AtomicBool,
}

impl DashboardContext {
    /// Build a context against the configured HTTP backend.
    ///
    /// # Errors
    /// [`AgendaError::Config`] for an invalid configuration or base URL.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let backend = Arc::new(HttpBackend::from_config(&config.backend)?);
        Self::with_backend(config, backend, SystemClock::shared())
    }

    /// Build a context over any backend implementation.
    ///
    /// # Errors
    /// [`AgendaError::Config`] for an invalid configuration.
    pub fn with_backend<B>(config: Config, backend: Arc<B>, clock: SharedClock) -> Result<Self>
    where
        B: ConnectivityProbe + ChangeFeed + MeetingRepository + 'static,
    {
        config.validate()?;

        let meetings: Arc<DynMeetingRepository> = backend.clone();
        let store = Arc::new(MeetingStateStore::new());
        let list_view = Arc::new(InMemoryListView::new());
        let detail_view = Arc::new(InMemoryDetailView::new());
        let tracker = DetailViewTracker::new();
        let indicator = Arc::new(IndicatorState::new());
        let notifier = Arc::new(QueuedNotifier::default());
        let metrics = Arc::new(CycleMetrics::new());

        let ui: Arc<dyn UiSyncTarget> = Arc::new(
            CompositeUiSync::new()
                .with_target(Arc::new(ListSyncTarget::new(
                    list_view.clone(),
                    config.monitoring.highlight(),
                )))
                .with_target(Arc::new(DetailSyncTarget::new(
                    detail_view.clone(),
                    tracker.clone(),
                    Arc::clone(&meetings),
                ))),
        );

        let ports = EnginePorts {
            connectivity: backend.clone(),
            changes: backend,
            meetings: Arc::clone(&meetings),
            store: Arc::clone(&store),
            ui: Arc::clone(&ui),
            indicator: indicator.clone(),
            notifier: notifier.clone(),
            tracker: tracker.clone(),
            clock: Arc::clone(&clock),
        };
        let engine =
            Arc::new(ReconciliationEngine::new(ports, EngineSettings::from_config(&config)));

        let scheduler = Arc::new(MonitoringScheduler::new(
            Arc::clone(&engine),
            MonitoringSchedulerConfig::from_config(&config.monitoring),
            Arc::clone(&metrics),
        ));

        let actions = Arc::new(MeetingActions::new(
            Arc::clone(&meetings),
            Arc::clone(&store),
            ui,
            notifier.clone(),
            clock,
        ));

        info!(base_url = %config.backend.base_url, "Dashboard context created");

        Ok(Self {
            config,
            store,
            engine,
            scheduler,
            actions,
            metrics,
            list_view,
            detail_view,
            tracker,
            indicator,
            notifier,
            meetings,
            disposed: AtomicBool::new(false),
        })
    }

    /// Start background monitoring. Returns `false` when monitoring is
    /// disabled by configuration.
    ///
    /// # Errors
    /// [`AgendaError::InvalidInput`] after [`Self::dispose`].
    #[instrument(skip(self))]
    pub async fn start_monitoring(&self) -> Result<bool> {
        self.ensure_active()?;

        if !self.config.monitoring.enabled {
            info!("Monitoring disabled by configuration; not starting");
            return Ok(false);
        }

        self.scheduler.start().await?;
        self.indicator.show_monitoring(&MonitoringStatus {
            active: true,
            activity_count: 0,
            message: MSG_MONITORING.to_string(),
        });
        Ok(true)
    }

    /// Stop background monitoring. Safe to call when already stopped.
    ///
    /// # Errors
    /// Propagates a scheduler shutdown failure.
    #[instrument(skip(self))]
    pub async fn stop_monitoring(&self) -> Result<()> {
        self.scheduler.stop().await?;
        self.indicator.show_monitoring(&MonitoringStatus {
            active: false,
            activity_count: 0,
            message: MSG_MONITORING_STOPPED.to_string(),
        });
        Ok(())
    }

    /// Run a cycle now with the failure counter reset.
    ///
    /// Goes through the scheduler when monitoring runs so the cadence timer
    /// restarts; otherwise drives the engine directly.
    ///
    /// # Errors
    /// [`AgendaError::InvalidInput`] after [`Self::dispose`].
    #[instrument(skip(self))]
    pub async fn force_update(&self) -> Result<CycleResult> {
        self.ensure_active()?;

        if self.scheduler.is_running() {
            return Ok(self.scheduler.force_update().await?.result);
        }

        debug!("Monitoring stopped; forcing a cycle on the engine directly");
        let outcome = self.engine.force_update().await;
        if let Err(err) = self.metrics.record_cycle(&outcome.result) {
            warn!(error = %err, "Failed to record forced cycle metric");
        }
        Ok(outcome.result)
    }

    /// Reload every meeting and re-render the list.
    ///
    /// # Errors
    /// Propagates the list fetch error; the list keeps its previous cards.
    pub async fn reload_meetings(&self) -> Result<usize> {
        self.ensure_active()?;
        let count = self.actions.reload_meetings().await?;
        self.list_view.render(&self.store.all());
        Ok(count)
    }

    /// Open the detail view for a meeting and render it with its response
    /// history.
    ///
    /// # Errors
    /// Propagates the meeting lookup error. A failed history fetch renders
    /// an empty history instead.
    #[instrument(skip(self))]
    pub async fn open_detail(&self, id: MeetingId) -> Result<DetailSnapshot> {
        self.ensure_active()?;
        self.tracker.open(id);

        let meeting = match self.store.get(id) {
            Some(meeting) => meeting,
            None => match self.meetings.get_meeting(id).await {
                Ok(meeting) => meeting,
                Err(err) => {
                    self.tracker.close();
                    return Err(err);
                }
            },
        };

        let responses = self.meetings.list_responses(id).await.unwrap_or_else(|err| {
            warn!(meeting_id = %id, error = %err, "Response history fetch failed");
            Vec::new()
        });

        self.detail_view.render_details(&meeting, &responses)?;
        self.detail_view
            .current()
            .ok_or_else(|| AgendaError::Internal(format!("detail view for meeting {id} is empty")))
    }

    pub fn close_detail(&self) {
        self.tracker.close();
        self.detail_view.clear();
    }

    /// Set a meeting's confirmation status from its wire name.
    ///
    /// # Errors
    /// [`AgendaError::InvalidInput`] for an unknown or non-manual status, or
    /// the backend error of the update.
    pub async fn set_confirmation_status(&self, id: MeetingId, status: &str) -> Result<()> {
        self.ensure_active()?;
        let status: ConfirmationStatus = status.parse()?;
        self.actions.set_confirmation_status(id, status).await
    }

    /// The user saved a meeting elsewhere on the page.
    ///
    /// # Errors
    /// Propagates the reload error.
    pub async fn meeting_saved(&self, meeting: Meeting) -> Result<usize> {
        self.ensure_active()?;
        let count = self.actions.record_saved(meeting).await?;
        self.list_view.render(&self.store.all());
        Ok(count)
    }

    /// The user deleted a meeting elsewhere on the page.
    ///
    /// # Errors
    /// Propagates the reload error.
    pub async fn meeting_deleted(&self, id: MeetingId) -> Result<usize> {
        self.ensure_active()?;
        if self.tracker.is_showing(id) {
            self.close_detail();
        }
        let count = self.actions.record_deleted(id).await?;
        self.list_view.render(&self.store.all());
        Ok(count)
    }

    pub fn status(&self) -> DashboardStatus {
        DashboardStatus {
            engine: self.engine.status(),
            metrics: self.metrics.snapshot(),
            connection: self.indicator.connection(),
            monitoring: self.indicator.monitoring(),
            meetings_loaded: self.store.len(),
        }
    }

    pub fn drain_notifications(&self) -> Vec<Notification> {
        self.notifier.drain()
    }

    /// End the view session: stop monitoring and clear the views.
    ///
    /// Idempotent. Every command fails with
    /// [`AgendaError::InvalidInput`] afterwards.
    ///
    /// # Errors
    /// Propagates a scheduler shutdown failure; the context still counts as
    /// disposed.
    #[instrument(skip(self))]
    pub async fn dispose(&self) -> Result<()> {
        if self.disposed.swap(true, Ordering::SeqCst) {
            debug!("Dashboard context already disposed");
            return Ok(());
        }

        info!("Disposing dashboard context");
        self.close_detail();
        self.list_view.unmount();
        self.stop_monitoring().await
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn ensure_active(&self) -> Result<()> {
        if self.is_disposed() {
            return Err(AgendaError::InvalidInput("dashboard context has been disposed".into()));
        }
        Ok(())
    }
}
