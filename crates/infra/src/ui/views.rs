//! View models for the meeting list and detail panes
//!
//! The hosting page renders from these; the sync targets in
//! `agendaflow-core` write to them through the [`ListView`] and
//! [`DetailView`] ports.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use agendaflow_core::ports::{DetailView, ListView};
use agendaflow_domain::{ClientResponse, ConfirmationStatus, Meeting, MeetingId, Result};
use parking_lot::RwLock;
use serde::Serialize;

/// Badge shown on a meeting card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub status: ConfirmationStatus,
    pub label: &'static str,
    pub css_class: String,
}

impl From<ConfirmationStatus> for StatusBadge {
    fn from(status: ConfirmationStatus) -> Self {
        Self { status, label: status.label(), css_class: status.css_class() }
    }
}

#[derive(Default)]
struct ListState {
    rendered: bool,
    cards: HashMap<MeetingId, StatusBadge>,
    highlights: HashMap<MeetingId, Instant>,
}

/// Meeting list: one badge per rendered card plus transient highlights.
#[derive(Default)]
pub struct InMemoryListView {
    state: RwLock<ListState>,
}

impl InMemoryListView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render a card for every meeting, replacing the previous cards.
    pub fn render(&self, meetings: &[Meeting]) {
        let mut state = self.state.write();
        state.rendered = true;
        state.cards = meetings
            .iter()
            .map(|meeting| (meeting.id, StatusBadge::from(meeting.confirmation_status)))
            .collect();
        state.highlights.retain(|id, _| meetings.iter().any(|meeting| meeting.id == *id));
    }

    /// The list left the screen.
    pub fn unmount(&self) {
        let mut state = self.state.write();
        state.rendered = false;
        state.cards.clear();
        state.highlights.clear();
    }

    pub fn badge(&self, id: MeetingId) -> Option<StatusBadge> {
        self.state.read().cards.get(&id).cloned()
    }

    pub fn is_highlighted(&self, id: MeetingId) -> bool {
        self.state.read().highlights.get(&id).is_some_and(|until| Instant::now() < *until)
    }
}

impl ListView for InMemoryListView {
    fn is_rendered(&self) -> bool {
        self.state.read().rendered
    }

    fn update_status_badge(&self, id: MeetingId, status: ConfirmationStatus) -> bool {
        let mut state = self.state.write();
        match state.cards.get_mut(&id) {
            Some(badge) => {
                *badge = StatusBadge::from(status);
                true
            }
            None => false,
        }
    }

    fn highlight_card(&self, id: MeetingId, duration: Duration) {
        self.state.write().highlights.insert(id, Instant::now() + duration);
    }
}

/// Content of an open detail pane
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailSnapshot {
    pub meeting: Meeting,
    pub badge: StatusBadge,
    pub responses: Vec<ClientResponse>,
}

/// Meeting detail pane
#[derive(Default)]
pub struct InMemoryDetailView {
    current: RwLock<Option<DetailSnapshot>>,
}

impl InMemoryDetailView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<DetailSnapshot> {
        self.current.read().clone()
    }

    pub fn clear(&self) {
        *self.current.write() = None;
    }
}

impl DetailView for InMemoryDetailView {
    fn render_details(&self, meeting: &Meeting, responses: &[ClientResponse]) -> Result<()> {
        *self.current.write() = Some(DetailSnapshot {
            meeting: meeting.clone(),
            badge: StatusBadge::from(meeting.confirmation_status),
            responses: responses.to_vec(),
        });
        Ok(())
    }
}
