//! Connectivity, reconciliation cycle and engine status types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;
use crate::types::meeting::MeetingId;

/// Result of asking the backend whether the WhatsApp link is up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectivityStatus {
    /// WhatsApp session is linked; responses can be polled.
    pub linked: bool,
    pub message: String,
    /// The backend itself answered, regardless of the link state.
    pub reachable: bool,
}

impl ConnectivityStatus {
    pub fn linked(message: impl Into<String>) -> Self {
        Self { linked: true, message: message.into(), reachable: true }
    }

    pub fn unlinked(message: impl Into<String>) -> Self {
        Self { linked: false, message: message.into(), reachable: true }
    }

    /// The backend could not be reached or answered garbage.
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self { linked: false, message: message.into(), reachable: false }
    }
}

/// Terminal state of one reconciliation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    /// Connectivity was up and every step finished.
    Completed,
    /// The WhatsApp link was down; nothing was fetched.
    Disconnected,
    /// A step failed; the failure counter was incremented.
    Failed,
    /// Another cycle was in flight; this invocation was dropped.
    Skipped,
}

impl_domain_status_conversions!(CycleStatus {
    Completed => "completed",
    Disconnected => "disconnected",
    Failed => "failed",
    Skipped => "skipped",
});

/// Telemetry for one reconciliation cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleResult {
    pub status: CycleStatus,
    pub duration_ms: u64,
    pub changes_applied: usize,
    pub error: Option<String>,
    pub finished_at: DateTime<Utc>,
}

impl CycleResult {
    pub const fn success(&self) -> bool {
        matches!(self.status, CycleStatus::Completed | CycleStatus::Disconnected)
    }

    pub fn skipped(at: DateTime<Utc>) -> Self {
        Self {
            status: CycleStatus::Skipped,
            duration_ms: 0,
            changes_applied: 0,
            error: None,
            finished_at: at,
        }
    }
}

/// Payload for the monitoring indicator widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitoringStatus {
    pub active: bool,
    pub activity_count: usize,
    pub message: String,
}

/// Point-in-time view of the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineStatus {
    pub is_running: bool,
    pub is_cycle_in_flight: bool,
    pub is_cooling_down: bool,
    pub consecutive_failures: u32,
    pub base_interval_ms: u64,
    pub current_interval_ms: u64,
    pub started_at: Option<DateTime<Utc>>,
    pub uptime_ms: u64,
    pub last_successful_cycle_at: Option<DateTime<Utc>>,
    pub last_cycle: Option<CycleResult>,
    pub active_detail_meeting_id: Option<MeetingId>,
}
