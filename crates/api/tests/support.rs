use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use agendaflow_common::testing::MockClock;
use agendaflow_core::{ChangeFeed, ConnectivityProbe, MeetingRepository};
use agendaflow_domain::{
    AgendaError, ChangeRecord, ClientResponse, ConfirmationStatus, Config, ConnectivityStatus,
    Meeting, MeetingId, Result,
};
use agendaflow_lib::DashboardContext;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

/// Backend double holding a meeting list; the change feed is always empty.
#[derive(Default)]
pub struct FakeBackend {
    pub meetings: Mutex<Vec<Meeting>>,
    pub responses: Mutex<Vec<ClientResponse>>,
    pub connectivity_calls: AtomicUsize,
    pub posts: Mutex<Vec<(MeetingId, ConfirmationStatus)>>,
}

impl FakeBackend {
    pub fn with_meetings(meetings: Vec<Meeting>) -> Arc<Self> {
        let backend = Self::default();
        *backend.meetings.lock() = meetings;
        Arc::new(backend)
    }

    pub fn connectivity_calls(&self) -> usize {
        self.connectivity_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ConnectivityProbe for FakeBackend {
    async fn connectivity_status(&self) -> Result<ConnectivityStatus> {
        self.connectivity_calls.fetch_add(1, Ordering::SeqCst);
        Ok(ConnectivityStatus::linked("WhatsApp conectado"))
    }
}

#[async_trait]
impl ChangeFeed for FakeBackend {
    async fn changes_since(&self, _since: DateTime<Utc>) -> Result<Vec<ChangeRecord>> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl MeetingRepository for FakeBackend {
    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
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
        Ok(self.responses.lock().clone())
    }

    async fn set_confirmation_status(
        &self,
        id: MeetingId,
        status: ConfirmationStatus,
    ) -> Result<()> {
        self.posts.lock().push((id, status));
        if let Some(meeting) = self.meetings.lock().iter_mut().find(|meeting| meeting.id == id) {
            meeting.confirmation_status = status;
        }
        Ok(())
    }
}

pub fn meeting(id: i64, title: &str) -> Meeting {
    Meeting::new(MeetingId(id), Utc::now()).with_title(title)
}

/// Config with short timings for paused-time tests.
pub fn fast_config() -> Config {
    let mut config = Config::default();
    config.monitoring.initial_delay_ms = 100;
    config.monitoring.base_interval_ms = 1_000;
    config
}

pub fn context_with(backend: Arc<FakeBackend>, config: Config) -> DashboardContext {
    DashboardContext::with_backend(config, backend, Arc::new(MockClock::new()))
        .expect("valid test configuration")
}
