//! End-to-end command tests against a mocked scheduling backend
//!
//! Builds the context with [`DashboardContext::new`], so the real HTTP
//! client, wire conversion and system clock are exercised.

use agendaflow_domain::{BackendConfig, Config, ConfirmationStatus, CycleStatus, MeetingId};
use agendaflow_lib::DashboardContext;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn context_for(server: &MockServer) -> DashboardContext {
    let mut config = Config::default();
    config.backend = BackendConfig {
        base_url: server.uri(),
        request_timeout_ms: 2_000,
        connectivity_timeout_ms: 2_000,
        max_attempts: 1,
        ..BackendConfig::default()
    };
    DashboardContext::new(config).expect("context over mock server")
}

async fn mount_meetings(server: &MockServer, status: &str) {
    Mock::given(method("GET"))
        .and(path("/meetings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 7,
                "titulo": "Reunião com Ana",
                "datetime": "2024-03-10T15:00:00",
                "status_confirmacao": status
            }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn reload_and_open_detail_over_http() {
    let server = MockServer::start().await;
    mount_meetings(&server, "pending").await;
    Mock::given(method("GET"))
        .and(path("/meetings/7/responses"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "responses": [{ "status": "unclear", "response_text": "talvez" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let context = context_for(&server);
    assert_eq!(agendaflow_lib::reload_meetings(&context).await.unwrap(), 1);

    let snapshot = agendaflow_lib::open_meeting_detail(&context, 7).await.unwrap();
    assert_eq!(snapshot.meeting.id, MeetingId(7));
    assert_eq!(snapshot.badge.label, "Pendente");
    assert_eq!(snapshot.responses.len(), 1);
    assert_eq!(snapshot.responses[0].status, ConfirmationStatus::Unclear);
}

#[tokio::test]
async fn forced_update_while_stopped_runs_one_cycle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/connectivity/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "connected": true,
            "status_message": "WhatsApp conectado"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/changes"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "success": true, "changes": [] })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let context = context_for(&server);
    let result = agendaflow_lib::force_update(&context).await.unwrap();

    assert_eq!(result.status, CycleStatus::Completed);
    assert_eq!(result.changes_applied, 0);
    let status = agendaflow_lib::monitoring_status(&context);
    assert!(status.connection.unwrap().linked);
    assert_eq!(status.metrics.completed, 1);
}

#[tokio::test]
async fn manual_status_command_posts_wire_name() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/meetings/7/confirmation"))
        .and(body_json(json!({ "status": "declined" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;
    mount_meetings(&server, "declined").await;

    let context = context_for(&server);
    agendaflow_lib::set_confirmation_status(&context, 7, "declined".to_string()).await.unwrap();

    assert_eq!(
        context.store.get(MeetingId(7)).unwrap().confirmation_status,
        ConfirmationStatus::Declined
    );
    assert_eq!(agendaflow_lib::take_notifications(&context).len(), 1);
}
