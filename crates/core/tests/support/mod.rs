//! Shared test helpers for `agendaflow-core` integration tests.
//!
//! [`MockBackend`] stands in for the HTTP backend behind every port, and the
//! recording views capture what the engine pushed to the UI.

#![allow(dead_code)]

pub mod backend;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use agendaflow_common::testing::MockClock;
use agendaflow_core::{
    CompositeUiSync, DetailSyncTarget, DetailViewTracker, EnginePorts, EngineSettings,
    ListSyncTarget, MeetingStateStore, ReconciliationEngine,
};

pub use backend::MockBackend;
pub use views::{RecordingDetailView, RecordingIndicator, RecordingListView, RecordingNotifier};

/// Engine wired to mocks, with handles to every mock for assertions.
pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub list: Arc<RecordingListView>,
    pub detail: Arc<RecordingDetailView>,
    pub indicator: Arc<RecordingIndicator>,
    pub notifier: Arc<RecordingNotifier>,
    pub tracker: DetailViewTracker,
    pub store: Arc<MeetingStateStore>,
    pub clock: MockClock,
    pub engine: Arc<ReconciliationEngine>,
}

impl Harness {
    pub fn new(backend: MockBackend) -> Self {
        Self::with_settings(backend, EngineSettings::default())
    }

    pub fn with_settings(backend: MockBackend, settings: EngineSettings) -> Self {
        let backend = Arc::new(backend);
        let list = Arc::new(RecordingListView::rendered());
        let detail = Arc::new(RecordingDetailView::default());
        let indicator = Arc::new(RecordingIndicator::default());
        let notifier = Arc::new(RecordingNotifier::default());
        let tracker = DetailViewTracker::new();
        let store = Arc::new(MeetingStateStore::new());
        let clock = MockClock::new();

        let ui = CompositeUiSync::new()
            .with_target(Arc::new(ListSyncTarget::new(list.clone(), Duration::from_millis(1_500))))
            .with_target(Arc::new(DetailSyncTarget::new(
                detail.clone(),
                tracker.clone(),
                backend.clone(),
            )));

        let ports = EnginePorts {
            connectivity: backend.clone(),
            changes: backend.clone(),
            meetings: backend.clone(),
            store: store.clone(),
            ui: Arc::new(ui),
            indicator: indicator.clone(),
            notifier: notifier.clone(),
            tracker: tracker.clone(),
            clock: Arc::new(clock.clone()),
        };
        let engine = Arc::new(ReconciliationEngine::new(ports, settings));

        Self { backend, list, detail, indicator, notifier, tracker, store, clock, engine }
    }
}
