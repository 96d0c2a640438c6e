//! Port interfaces
//!
//! These traits define the boundaries between the reconciliation logic and
//! the infrastructure (backend HTTP API, rendered views, notifications).

use std::time::Duration;

use agendaflow_domain::{
    ChangeRecord, ClientResponse, ConfirmationStatus, ConnectivityStatus, Meeting, MeetingId,
    MonitoringStatus, Notification, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Backend WhatsApp link status
#[async_trait]
pub trait ConnectivityProbe: Send + Sync {
    /// Query the link state. Errors mean the backend could not be asked.
    async fn connectivity_status(&self) -> Result<ConnectivityStatus>;
}

/// Backend feed of confirmation-status changes
#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Changes whose status was updated at or after `since`.
    async fn changes_since(&self, since: DateTime<Utc>) -> Result<Vec<ChangeRecord>>;
}

/// Backend meeting records
#[async_trait]
pub trait MeetingRepository: Send + Sync {
    /// Full meeting list.
    async fn list_meetings(&self) -> Result<Vec<Meeting>>;

    /// A single meeting by id.
    async fn get_meeting(&self, id: MeetingId) -> Result<Meeting>;

    /// Response history for a meeting, newest first as the backend orders it.
    async fn list_responses(&self, id: MeetingId) -> Result<Vec<ClientResponse>>;

    /// Set the confirmation status by hand. Sent once, never retried.
    async fn set_confirmation_status(&self, id: MeetingId, status: ConfirmationStatus)
        -> Result<()>;
}

/// Rendered meeting list
pub trait ListView: Send + Sync {
    /// Whether the list is currently on screen.
    fn is_rendered(&self) -> bool;

    /// Update the badge of the card for `id`. Returns `false` when no card
    /// with that id is rendered.
    fn update_status_badge(&self, id: MeetingId, status: ConfirmationStatus) -> bool;

    /// Start the transient highlight on the card for `id`.
    fn highlight_card(&self, id: MeetingId, duration: Duration);
}

/// Meeting detail view
pub trait DetailView: Send + Sync {
    /// Replace the detail content with `meeting` and its response history.
    fn render_details(&self, meeting: &Meeting, responses: &[ClientResponse]) -> Result<()>;
}

/// Connection and monitoring status widgets
pub trait StatusIndicator: Send + Sync {
    fn show_connection(&self, status: &ConnectivityStatus);

    fn show_monitoring(&self, status: &MonitoringStatus);
}

/// User-visible notifications (toasts)
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification);
}
