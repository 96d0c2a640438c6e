//! Monitoring commands

use agendaflow_domain::{CycleResult, Result};
use tracing::info;

use crate::context::{DashboardContext, DashboardStatus};
use crate::utils::command_helpers::execute_command;

/// Start background monitoring for this view session.
///
/// Returns `false` when monitoring is disabled in the configuration.
pub async fn start_monitoring(ctx: &DashboardContext) -> Result<bool> {
    execute_command("monitoring::start_monitoring", || ctx.start_monitoring()).await
}

/// Stop background monitoring. An in-flight cycle still completes.
pub async fn stop_monitoring(ctx: &DashboardContext) -> Result<()> {
    execute_command("monitoring::stop_monitoring", || ctx.stop_monitoring()).await
}

/// Check for new responses now
///
/// Called by the "update" button and right after the user sends a message.
/// Resets the failure counter; still skipped if a cycle is in flight.
pub async fn force_update(ctx: &DashboardContext) -> Result<CycleResult> {
    info!("Forcing reconciliation cycle");
    execute_command("monitoring::force_update", || ctx.force_update()).await
}

/// Engine, metrics and widget state in one snapshot
///
/// # Example Response
/// ```json
/// {
///   "engine": { "is_running": true, "consecutive_failures": 0, "current_interval_ms": 5000, ... },
///   "metrics": { "completed": 12, "failed": 1, "changes_applied": 3, ... },
///   "connection": { "linked": true, "message": "WhatsApp conectado", "reachable": true },
///   "monitoring": { "active": true, "activity_count": 0, "message": "Monitorando respostas..." },
///   "meetings_loaded": 18
/// }
/// ```
pub fn monitoring_status(ctx: &DashboardContext) -> DashboardStatus {
    ctx.status()
}
