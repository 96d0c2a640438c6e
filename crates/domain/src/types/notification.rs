//! User-visible notifications

use serde::{Deserialize, Serialize};

use crate::constants::MSG_SUMMARY_PREFIX;
use crate::types::meeting::{ChangeRecord, ConfirmationStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast-style message for the hosting page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self { level, message: message.into() }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

/// Per-status counts of the changes applied in one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChangeSummary {
    pub confirmed: usize,
    pub declined: usize,
    pub pending: usize,
}

impl ChangeSummary {
    pub fn from_changes<'a>(changes: impl IntoIterator<Item = &'a ChangeRecord>) -> Self {
        changes.into_iter().fold(Self::default(), |mut summary, change| {
            match change.new_status {
                ConfirmationStatus::Confirmed => summary.confirmed += 1,
                ConfirmationStatus::Declined => summary.declined += 1,
                ConfirmationStatus::Pending => summary.pending += 1,
                ConfirmationStatus::Unclear | ConfirmationStatus::Reschedule => {}
            }
            summary
        })
    }

    pub const fn is_empty(&self) -> bool {
        self.confirmed == 0 && self.declined == 0 && self.pending == 0
    }

    /// Summary notification, or `None` when nothing countable changed.
    pub fn to_notification(&self) -> Option<Notification> {
        if self.is_empty() {
            return None;
        }

        let mut parts = Vec::with_capacity(3);
        if self.confirmed > 0 {
            parts.push(format!("{} confirmação(ões)", self.confirmed));
        }
        if self.declined > 0 {
            parts.push(format!("{} recusa(s)", self.declined));
        }
        if self.pending > 0 {
            parts.push(format!("{} pendente(s)", self.pending));
        }

        let level = if self.declined == 0 && self.pending == 0 {
            NotificationLevel::Success
        } else {
            NotificationLevel::Info
        };

        Some(Notification::new(level, format!("{MSG_SUMMARY_PREFIX}: {}", parts.join(", "))))
    }
}
