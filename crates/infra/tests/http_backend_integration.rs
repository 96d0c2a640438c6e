//! Integration tests for the HTTP backend driving a real engine
//!
//! **Purpose**: Test the critical path from backend JSON → wire conversion →
//! engine cycle → store and views
//!
//! **Coverage:**
//! - Happy path: linked → changes → reload → badge, highlight, summary toast
//! - Redelivered change inside the lookback window is not reprocessed
//! - A change with null fields is dropped without failing the cycle
//! - Unlinked backend: no change fetch
//! - Feed errors count as failures and never escape the engine
//! - Manual status update: POST once, no retry on failure
//!
//! **Infrastructure:**
//! - WireMock HTTP server (simulates the scheduling backend)
//! - `HttpBackend` with real `reqwest` client
//! - In-memory views from `agendaflow_infra::ui`

use std::sync::Arc;

use agendaflow_common::testing::MockClock;
use agendaflow_common::SharedClock;
use agendaflow_core::{
    CompositeUiSync, DetailSyncTarget, DetailViewTracker, EnginePorts, EngineSettings,
    ListSyncTarget, MeetingActions, MeetingStateStore, ReconciliationEngine, UiSyncTarget,
};
use agendaflow_domain::{
    AgendaError, BackendConfig, ConfirmationStatus, Config, CycleStatus, MeetingId,
    NotificationLevel,
};
use agendaflow_infra::ui::{IndicatorState, InMemoryDetailView, InMemoryListView, QueuedNotifier};
use agendaflow_infra::HttpBackend;
use chrono::{TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Wiring
// ============================================================================

struct Dashboard {
    engine: ReconciliationEngine,
    actions: MeetingActions,
    store: Arc<MeetingStateStore>,
    list: Arc<InMemoryListView>,
    detail: Arc<InMemoryDetailView>,
    tracker: DetailViewTracker,
    indicator: Arc<IndicatorState>,
    notifier: Arc<QueuedNotifier>,
}

fn dashboard_for(server: &MockServer) -> Dashboard {
    let mut config = Config::default();
    config.backend = BackendConfig {
        base_url: server.uri(),
        request_timeout_ms: 2_000,
        connectivity_timeout_ms: 2_000,
        max_attempts: 1,
        ..BackendConfig::default()
    };

    let backend = Arc::new(HttpBackend::from_config(&config.backend).expect("valid backend url"));
    // Lookback window: 2024-03-05T14:27:00Z .. 14:32:00Z
    let clock: SharedClock =
        Arc::new(MockClock::at(Utc.with_ymd_and_hms(2024, 3, 5, 14, 32, 0).unwrap()));

    let store = Arc::new(MeetingStateStore::new());
    let list = Arc::new(InMemoryListView::new());
    let detail = Arc::new(InMemoryDetailView::new());
    let indicator = Arc::new(IndicatorState::new());
    let notifier = Arc::new(QueuedNotifier::default());
    let tracker = DetailViewTracker::new();

    let ui: Arc<dyn UiSyncTarget> = Arc::new(
        CompositeUiSync::new()
            .with_target(Arc::new(ListSyncTarget::new(list.clone(), config.monitoring.highlight())))
            .with_target(Arc::new(DetailSyncTarget::new(
                detail.clone(),
                tracker.clone(),
                backend.clone(),
            ))),
    );

    let ports = EnginePorts {
        connectivity: backend.clone(),
        changes: backend.clone(),
        meetings: backend.clone(),
        store: store.clone(),
        ui: ui.clone(),
        indicator: indicator.clone(),
        notifier: notifier.clone(),
        tracker: tracker.clone(),
        clock: clock.clone(),
    };
    let engine = ReconciliationEngine::new(ports, EngineSettings::from_config(&config));
    let actions = MeetingActions::new(backend, store.clone(), ui, notifier.clone(), clock);

    Dashboard { engine, actions, store, list, detail, tracker, indicator, notifier }
}

async fn mount_linked(server: &MockServer, connected: bool) {
    Mock::given(method("GET"))
        .and(path("/connectivity/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connected": connected,
            "status_message": if connected { "WhatsApp conectado" } else { "Aguardando QR code" }
        })))
        .mount(server)
        .await;
}

fn meeting_list(status: &str) -> serde_json::Value {
    json!([
        {
            "id": 7,
            "titulo": "Reunião com Ana",
            "convidado": "Ana",
            "datetime": "2024-03-10T15:00:00",
            "status_confirmacao": status,
            "numero_pessoas": "3"
        },
        {
            "id": 8,
            "titulo": "Revisão de contrato",
            "datetime": "2024-03-11 09:30",
            "status_confirmacao": ""
        }
    ])
}

// ============================================================================
// Cycles
// ============================================================================

#[tokio::test]
async fn cycle_applies_backend_change_to_store_and_views() {
    let server = MockServer::start().await;
    mount_linked(&server, true).await;

    Mock::given(method("GET"))
        .and(path("/changes"))
        .and(query_param("since", "2024-03-05T14:27:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "changes": [
                { "meeting_id": 7, "current_status": "declined", "received_at": "2024-03-05T14:30:00" }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meeting_list("declined")))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = dashboard_for(&server);
    let mut before = agendaflow_domain::Meeting::new(MeetingId(7), Utc::now());
    before.confirmation_status = ConfirmationStatus::Pending;
    dashboard.list.render(&[before]);

    let outcome = dashboard.engine.run_cycle().await;
    assert_eq!(outcome.result.status, CycleStatus::Completed);
    assert_eq!(outcome.result.changes_applied, 1);

    let stored = dashboard.store.get(MeetingId(7)).expect("meeting 7 loaded");
    assert_eq!(stored.confirmation_status, ConfirmationStatus::Declined);
    assert_eq!(stored.title.as_deref(), Some("Reunião com Ana"));
    assert_eq!(stored.number_of_people, Some(3));

    let blank_status = dashboard.store.get(MeetingId(8)).expect("meeting 8 loaded");
    assert_eq!(blank_status.confirmation_status, ConfirmationStatus::Pending);

    let badge = dashboard.list.badge(MeetingId(7)).unwrap();
    assert_eq!(badge.label, "Recusada");
    assert!(dashboard.list.is_highlighted(MeetingId(7)));

    let notifications = dashboard.notifier.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Info);
    assert!(notifications[0].message.contains("1 recusa(s)"));

    assert!(dashboard.indicator.connection().unwrap().linked);

    // Same change redelivered inside the window: no reload, no toast
    let second = dashboard.engine.run_cycle().await;
    assert_eq!(second.result.status, CycleStatus::Completed);
    assert_eq!(second.result.changes_applied, 0);
    assert!(dashboard.notifier.is_empty());
}

#[tokio::test]
async fn null_status_change_does_not_fail_the_cycle() {
    let server = MockServer::start().await;
    mount_linked(&server, true).await;

    Mock::given(method("GET"))
        .and(path("/changes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "changes": [
                { "meeting_id": 8, "current_status": null, "received_at": "2024-03-05T14:29:00" },
                { "meeting_id": 7, "current_status": "confirmed", "received_at": "2024-03-05T14:30:00" }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meeting_list("confirmed")))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = dashboard_for(&server);
    let outcome = dashboard.engine.run_cycle().await;

    assert_eq!(outcome.result.status, CycleStatus::Completed);
    assert_eq!(outcome.result.changes_applied, 1);
    assert_eq!(dashboard.engine.consecutive_failures(), 0);
    assert_eq!(
        dashboard.store.get(MeetingId(7)).unwrap().confirmation_status,
        ConfirmationStatus::Confirmed
    );
}

#[tokio::test]
async fn open_detail_view_is_rerendered_with_history() {
    let server = MockServer::start().await;
    mount_linked(&server, true).await;

    Mock::given(method("GET"))
        .and(path("/changes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "changes": [
                { "meeting_id": 7, "status": "confirmed", "updated_at": "2024-03-05T14:31:10Z" }
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meeting_list("confirmed")))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/meetings/7/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "responses": [
                {
                    "status": "confirmed",
                    "confidence": 0.93,
                    "response_text": "Confirmado, estarei lá",
                    "received_at": "2024-03-05T14:31:10Z"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = dashboard_for(&server);
    dashboard.tracker.open(MeetingId(7));

    let outcome = dashboard.engine.run_cycle().await;
    assert_eq!(outcome.result.changes_applied, 1);

    let snapshot = dashboard.detail.current().expect("detail re-rendered");
    assert_eq!(snapshot.meeting.id, MeetingId(7));
    assert_eq!(snapshot.badge.status, ConfirmationStatus::Confirmed);
    assert_eq!(snapshot.responses.len(), 1);
    assert_eq!(snapshot.responses[0].response_text.as_deref(), Some("Confirmado, estarei lá"));

    let notifications = dashboard.notifier.drain();
    assert_eq!(notifications[0].level, NotificationLevel::Success);
}

#[tokio::test]
async fn unlinked_backend_skips_change_fetch() {
    let server = MockServer::start().await;
    mount_linked(&server, false).await;

    Mock::given(method("GET"))
        .and(path("/changes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(0)
        .mount(&server)
        .await;

    let dashboard = dashboard_for(&server);
    let outcome = dashboard.engine.run_cycle().await;

    assert_eq!(outcome.result.status, CycleStatus::Disconnected);
    let connection = dashboard.indicator.connection().unwrap();
    assert!(!connection.linked);
    assert_eq!(connection.message, "Aguardando QR code");
}

#[tokio::test]
async fn feed_errors_are_counted_not_raised() {
    let server = MockServer::start().await;
    mount_linked(&server, true).await;

    Mock::given(method("GET"))
        .and(path("/changes"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let dashboard = dashboard_for(&server);

    let first = dashboard.engine.run_cycle().await;
    assert_eq!(first.result.status, CycleStatus::Failed);
    assert!(first.result.error.is_some());
    assert!(first.backoff.is_none());
    assert_eq!(dashboard.engine.consecutive_failures(), 1);

    let _ = dashboard.engine.run_cycle().await;
    let third = dashboard.engine.run_cycle().await;
    assert!(third.backoff.is_some(), "default threshold of 3 reached");
    assert!(dashboard.notifier.is_empty(), "background failures do not toast");
}

// ============================================================================
// Manual status update
// ============================================================================

#[tokio::test]
async fn manual_status_update_posts_once_and_refreshes() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/meetings/7/confirmation"))
        .and(body_json(json!({ "status": "confirmed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(meeting_list("confirmed")))
        .mount(&server)
        .await;

    let dashboard = dashboard_for(&server);
    dashboard.actions.set_confirmation_status(MeetingId(7), ConfirmationStatus::Confirmed).await.unwrap();

    assert_eq!(
        dashboard.store.get(MeetingId(7)).unwrap().confirmation_status,
        ConfirmationStatus::Confirmed
    );
    let notifications = dashboard.notifier.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Success);
}

#[tokio::test]
async fn failed_manual_update_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/meetings/7/confirmation"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let dashboard = dashboard_for(&server);
    let err = dashboard
        .actions
        .set_confirmation_status(MeetingId(7), ConfirmationStatus::Declined)
        .await
        .unwrap_err();

    assert!(matches!(err, AgendaError::Network(_)));
    let notifications = dashboard.notifier.drain();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].level, NotificationLevel::Error);
}

#[tokio::test]
async fn unsettable_status_never_reaches_the_backend() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let dashboard = dashboard_for(&server);
    let err = dashboard
        .actions
        .set_confirmation_status(MeetingId(7), ConfirmationStatus::Reschedule)
        .await
        .unwrap_err();

    assert!(matches!(err, AgendaError::InvalidInput(_)));
}
