//! Scriptable in-memory backend implementing every backend port.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use agendaflow_core::{ChangeFeed, ConnectivityProbe, MeetingRepository};
use agendaflow_domain::{
    AgendaError, ChangeRecord, ClientResponse, ConfirmationStatus, ConnectivityStatus, Meeting,
    MeetingId, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

pub struct MockBackend {
    linked: AtomicBool,
    reachable: AtomicBool,
    fail_changes: AtomicBool,
    fail_list: AtomicBool,
    change_delay: Mutex<Duration>,
    meetings: Mutex<Vec<Meeting>>,
    changes: Mutex<Vec<ChangeRecord>>,
    responses: Mutex<HashMap<MeetingId, Vec<ClientResponse>>>,
    connectivity_calls: AtomicUsize,
    change_calls: AtomicUsize,
    list_calls: AtomicUsize,
    posts: Mutex<Vec<(MeetingId, ConfirmationStatus)>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            linked: AtomicBool::new(true),
            reachable: AtomicBool::new(true),
            fail_changes: AtomicBool::new(false),
            fail_list: AtomicBool::new(false),
            change_delay: Mutex::new(Duration::ZERO),
            meetings: Mutex::new(Vec::new()),
            changes: Mutex::new(Vec::new()),
            responses: Mutex::new(HashMap::new()),
            connectivity_calls: AtomicUsize::new(0),
            change_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
            posts: Mutex::new(Vec::new()),
        }
    }
}

impl MockBackend {
    /// Linked backend holding meetings with the given ids, all pending.
    pub fn with_meetings(ids: &[i64]) -> Self {
        let backend = Self::default();
        *backend.meetings.lock() = ids
            .iter()
            .map(|id| Meeting::new(MeetingId(*id), Utc::now()).with_title(format!("Reunião {id}")))
            .collect();
        backend
    }

    pub fn set_linked(&self, linked: bool) {
        self.linked.store(linked, Ordering::SeqCst);
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn fail_changes(&self, fail: bool) {
        self.fail_changes.store(fail, Ordering::SeqCst);
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_change_delay(&self, delay: Duration) {
        *self.change_delay.lock() = delay;
    }

    /// Change a meeting's status server-side and publish it on the feed.
    pub fn push_change(&self, id: i64, status: ConfirmationStatus, at: DateTime<Utc>) {
        for meeting in self.meetings.lock().iter_mut().filter(|meeting| meeting.id == MeetingId(id))
        {
            meeting.confirmation_status = status;
        }
        self.changes.lock().push(ChangeRecord::new(MeetingId(id), status, at));
    }

    /// Publish a change without touching the meeting list.
    pub fn push_raw_change(&self, change: ChangeRecord) {
        self.changes.lock().push(change);
    }

    pub fn set_responses(&self, id: i64, responses: Vec<ClientResponse>) {
        self.responses.lock().insert(MeetingId(id), responses);
    }

    pub fn connectivity_calls(&self) -> usize {
        self.connectivity_calls.load(Ordering::SeqCst)
    }

    pub fn change_calls(&self) -> usize {
        self.change_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn posts(&self) -> Vec<(MeetingId, ConfirmationStatus)> {
        self.posts.lock().clone()
    }
}

#[async_trait]
impl ConnectivityProbe for MockBackend {
    async fn connectivity_status(&self) -> Result<ConnectivityStatus> {
        self.connectivity_calls.fetch_add(1, Ordering::SeqCst);
        if !self.reachable.load(Ordering::SeqCst) {
            return Err(AgendaError::Network("connection refused".into()));
        }
        if self.linked.load(Ordering::SeqCst) {
            Ok(ConnectivityStatus::linked("WhatsApp conectado"))
        } else {
            Ok(ConnectivityStatus::unlinked("QR code pendente"))
        }
    }
}

#[async_trait]
impl ChangeFeed for MockBackend {
    async fn changes_since(&self, since: DateTime<Utc>) -> Result<Vec<ChangeRecord>> {
        self.change_calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.change_delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if self.fail_changes.load(Ordering::SeqCst) {
            return Err(AgendaError::Timeout("changes request timed out".into()));
        }

        Ok(self.changes.lock().iter().filter(|change| change.updated_at >= since).cloned().collect())
    }
}

#[async_trait]
impl MeetingRepository for MockBackend {
    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(AgendaError::Network("connection reset".into()));
        }
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

    async fn list_responses(&self, id: MeetingId) -> Result<Vec<ClientResponse>> {
        Ok(self.responses.lock().get(&id).cloned().unwrap_or_default())
    }

    async fn set_confirmation_status(
        &self,
        id: MeetingId,
        status: ConfirmationStatus,
    ) -> Result<()> {
        self.posts.lock().push((id, status));
        for meeting in self.meetings.lock().iter_mut().filter(|meeting| meeting.id == id) {
            meeting.confirmation_status = status;
        }
        Ok(())
    }
}
