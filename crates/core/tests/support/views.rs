//! Recording UI ports.

use std::time::Duration;

use agendaflow_core::{DetailView, ListView, Notifier, StatusIndicator};
use agendaflow_domain::{
    ClientResponse, ConfirmationStatus, ConnectivityStatus, Meeting, MeetingId, MonitoringStatus,
    Notification, Result,
};
use parking_lot::Mutex;

/// List view where every meeting has a card once rendered.
#[derive(Default)]
pub struct RecordingListView {
    rendered: bool,
    badges: Mutex<Vec<(MeetingId, ConfirmationStatus)>>,
    highlights: Mutex<Vec<MeetingId>>,
}

impl RecordingListView {
    pub fn rendered() -> Self {
        Self { rendered: true, ..Self::default() }
    }

    pub fn badges(&self) -> Vec<(MeetingId, ConfirmationStatus)> {
        self.badges.lock().clone()
    }

    pub fn highlights(&self) -> Vec<MeetingId> {
        self.highlights.lock().clone()
    }
}

impl ListView for RecordingListView {
    fn is_rendered(&self) -> bool {
        self.rendered
    }

    fn update_status_badge(&self, id: MeetingId, status: ConfirmationStatus) -> bool {
        self.badges.lock().push((id, status));
        true
    }

    fn highlight_card(&self, id: MeetingId, _duration: Duration) {
        self.highlights.lock().push(id);
    }
}

/// Detail view that keeps the label and history size of every render.
#[derive(Default)]
pub struct RecordingDetailView {
    renders: Mutex<Vec<(MeetingId, String, usize)>>,
}

impl RecordingDetailView {
    pub fn renders(&self) -> Vec<(MeetingId, String, usize)> {
        self.renders.lock().clone()
    }
}

impl DetailView for RecordingDetailView {
    fn render_details(&self, meeting: &Meeting, responses: &[ClientResponse]) -> Result<()> {
        self.renders.lock().push((
            meeting.id,
            meeting.confirmation_status.label().to_string(),
            responses.len(),
        ));
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingIndicator {
    connections: Mutex<Vec<ConnectivityStatus>>,
    monitoring: Mutex<Vec<MonitoringStatus>>,
}

impl RecordingIndicator {
    pub fn connections(&self) -> Vec<ConnectivityStatus> {
        self.connections.lock().clone()
    }

    pub fn monitoring(&self) -> Vec<MonitoringStatus> {
        self.monitoring.lock().clone()
    }

    pub fn last_monitoring(&self) -> Option<MonitoringStatus> {
        self.monitoring.lock().last().cloned()
    }
}

impl StatusIndicator for RecordingIndicator {
    fn show_connection(&self, status: &ConnectivityStatus) {
        self.connections.lock().push(status.clone());
    }

    fn show_monitoring(&self, status: &MonitoringStatus) {
        self.monitoring.lock().push(status.clone());
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) {
        self.notifications.lock().push(notification.clone());
    }
}
