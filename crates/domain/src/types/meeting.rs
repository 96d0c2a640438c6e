//! Meeting records and confirmation status types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Stable backend identifier of a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeetingId(pub i64);

impl MeetingId {
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MeetingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for MeetingId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Confirmation state of a meeting as decided by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfirmationStatus {
    #[default]
    Pending,
    Confirmed,
    Declined,
    Unclear,
    Reschedule,
}

impl_domain_status_conversions!(ConfirmationStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    Declined => "declined",
    Unclear => "unclear",
    Reschedule => "reschedule",
});

impl ConfirmationStatus {
    /// Label shown on badges and in the detail view.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pendente",
            Self::Confirmed => "Confirmada",
            Self::Declined => "Recusada",
            Self::Unclear => "Não Clara",
            Self::Reschedule => "Reagendar",
        }
    }

    /// Badge CSS class, e.g. `status-declined`.
    pub fn css_class(&self) -> String {
        format!("status-{}", self.as_str())
    }

    /// Statuses a user may set by hand from the dashboard.
    pub const fn is_manually_settable(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed | Self::Declined)
    }
}

/// Client-side copy of a meeting record. The backend is the source of truth.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: MeetingId,
    pub title: Option<String>,
    pub guest: Option<String>,
    pub subject: Option<String>,
    pub client: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub link: Option<String>,
    pub datetime: DateTime<Utc>,
    #[serde(default)]
    pub confirmation_status: ConfirmationStatus,
    pub number_of_people: Option<u32>,
    /// When the backend last changed `confirmation_status`, if it reports it.
    #[serde(default)]
    pub status_updated_at: Option<DateTime<Utc>>,
}

impl Meeting {
    /// Create a meeting with only the required fields set.
    pub fn new(id: MeetingId, datetime: DateTime<Utc>) -> Self {
        Self {
            id,
            title: None,
            guest: None,
            subject: None,
            client: None,
            phone: None,
            location: None,
            link: None,
            datetime,
            confirmation_status: ConfirmationStatus::Pending,
            number_of_people: None,
            status_updated_at: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub const fn with_status(mut self, status: ConfirmationStatus) -> Self {
        self.confirmation_status = status;
        self
    }

    /// Title for display, falling back to the guest name.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().or(self.guest.as_deref()).unwrap_or("Reunião")
    }
}

/// One confirmation-status change reported by the change feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub meeting_id: MeetingId,
    pub new_status: ConfirmationStatus,
    pub updated_at: DateTime<Utc>,
}

impl ChangeRecord {
    pub const fn new(
        meeting_id: MeetingId,
        new_status: ConfirmationStatus,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self { meeting_id, new_status, updated_at }
    }
}

/// A client reply recorded against a meeting (response history entry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientResponse {
    pub status: ConfirmationStatus,
    pub confidence: Option<f64>,
    pub response_text: Option<String>,
    pub received_at: Option<DateTime<Utc>>,
}
