//! Scheduling infrastructure for the monitoring loop
//!
//! [`MonitoringScheduler`] drives a
//! [`ReconciliationEngine`](agendaflow_core::ReconciliationEngine) on its
//! own tokio tasks:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on shutdown

pub mod error;
pub mod monitoring_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use monitoring_scheduler::{MonitoringScheduler, MonitoringSchedulerConfig};
