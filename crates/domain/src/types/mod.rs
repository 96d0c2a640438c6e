//! Domain data types
//!
//! - [`meeting`]: meeting records, confirmation statuses, change records and
//!   response history
//! - [`monitoring`]: connectivity, cycle telemetry and engine status
//! - [`notification`]: user-visible notifications and change summaries

pub mod meeting;
pub mod monitoring;
pub mod notification;

pub use meeting::{ChangeRecord, ClientResponse, ConfirmationStatus, Meeting, MeetingId};
pub use monitoring::{
    ConnectivityStatus, CycleResult, CycleStatus, EngineStatus, MonitoringStatus,
};
pub use notification::{ChangeSummary, Notification, NotificationLevel};
