//! UI sync targets
//!
//! A target re-renders whichever surface currently shows a meeting. Targets
//! never fail outward: view or history errors are logged and reported as
//! [`RefreshOutcome::Failed`], and a meeting that is not on screen is a
//! no-op.

use std::sync::Arc;
use std::time::Duration;

use agendaflow_domain::{Meeting, MeetingId};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::ports::{DetailView, ListView, MeetingRepository};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated,
    NotVisible,
    Failed,
}

/// A surface that may be displaying a meeting.
#[async_trait]
pub trait UiSyncTarget: Send + Sync {
    /// Short name for log fields.
    fn name(&self) -> &'static str;

    /// Re-render `meeting_id` from `meeting` if it is visible.
    async fn refresh(&self, meeting_id: MeetingId, meeting: &Meeting) -> RefreshOutcome;
}

/// Which meeting the detail view is showing, if any.
///
/// Written by the hosting page when the detail view opens or closes; the
/// reconciliation engine only reads it.
#[derive(Debug, Clone, Default)]
pub struct DetailViewTracker {
    active: Arc<RwLock<Option<MeetingId>>>,
}

impl DetailViewTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&self, id: MeetingId) {
        *self.active.write() = Some(id);
    }

    pub fn close(&self) {
        *self.active.write() = None;
    }

    pub fn active(&self) -> Option<MeetingId> {
        *self.active.read()
    }

    pub fn is_showing(&self, id: MeetingId) -> bool {
        self.active() == Some(id)
    }
}

/// Updates the status badge of the meeting's card in the list view.
pub struct ListSyncTarget {
    view: Arc<dyn ListView>,
    highlight: Duration,
}

impl ListSyncTarget {
    pub fn new(view: Arc<dyn ListView>, highlight: Duration) -> Self {
        Self { view, highlight }
    }
}

#[async_trait]
impl UiSyncTarget for ListSyncTarget {
    fn name(&self) -> &'static str {
        "list"
    }

    async fn refresh(&self, meeting_id: MeetingId, meeting: &Meeting) -> RefreshOutcome {
        if !self.view.is_rendered() {
            return RefreshOutcome::NotVisible;
        }
        if !self.view.update_status_badge(meeting_id, meeting.confirmation_status) {
            debug!(meeting_id = %meeting_id, "no card rendered for meeting");
            return RefreshOutcome::NotVisible;
        }
        self.view.highlight_card(meeting_id, self.highlight);
        RefreshOutcome::Updated
    }
}

/// Re-renders the detail view when it is showing the refreshed meeting.
pub struct DetailSyncTarget {
    view: Arc<dyn DetailView>,
    tracker: DetailViewTracker,
    repository: Arc<dyn MeetingRepository>,
}

impl DetailSyncTarget {
    pub fn new(
        view: Arc<dyn DetailView>,
        tracker: DetailViewTracker,
        repository: Arc<dyn MeetingRepository>,
    ) -> Self {
        Self { view, tracker, repository }
    }
}

#[async_trait]
impl UiSyncTarget for DetailSyncTarget {
    fn name(&self) -> &'static str {
        "detail"
    }

    async fn refresh(&self, meeting_id: MeetingId, meeting: &Meeting) -> RefreshOutcome {
        if !self.tracker.is_showing(meeting_id) {
            return RefreshOutcome::NotVisible;
        }

        let responses = match self.repository.list_responses(meeting_id).await {
            Ok(responses) => responses,
            Err(err) => {
                warn!(meeting_id = %meeting_id, error = %err, "response history fetch failed");
                Vec::new()
            }
        };

        // The view may have been closed or switched while the history loaded.
        if !self.tracker.is_showing(meeting_id) {
            debug!(meeting_id = %meeting_id, "detail view changed during refresh; discarding");
            return RefreshOutcome::NotVisible;
        }

        match self.view.render_details(meeting, &responses) {
            Ok(()) => RefreshOutcome::Updated,
            Err(err) => {
                warn!(meeting_id = %meeting_id, error = %err, "detail re-render failed");
                RefreshOutcome::Failed
            }
        }
    }
}

/// Fans a refresh out to every registered target.
#[derive(Default)]
pub struct CompositeUiSync {
    targets: Vec<Arc<dyn UiSyncTarget>>,
}

impl CompositeUiSync {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_target(mut self, target: Arc<dyn UiSyncTarget>) -> Self {
        self.targets.push(target);
        self
    }
}

#[async_trait]
impl UiSyncTarget for CompositeUiSync {
    fn name(&self) -> &'static str {
        "composite"
    }

    async fn refresh(&self, meeting_id: MeetingId, meeting: &Meeting) -> RefreshOutcome {
        let mut updated = false;
        let mut failed = false;

        for target in &self.targets {
            match target.refresh(meeting_id, meeting).await {
                RefreshOutcome::Updated => updated = true,
                RefreshOutcome::Failed => failed = true,
                RefreshOutcome::NotVisible => {}
            }
            debug!(meeting_id = %meeting_id, target = target.name(), "ui target refreshed");
        }

        if updated {
            RefreshOutcome::Updated
        } else if failed {
            RefreshOutcome::Failed
        } else {
            RefreshOutcome::NotVisible
        }
    }
}
