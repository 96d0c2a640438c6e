//! Meeting list and detail commands

use agendaflow_domain::{Meeting, MeetingId, Notification, Result};
use agendaflow_infra::ui::DetailSnapshot;
use tracing::info;

use crate::context::DashboardContext;
use crate::utils::command_helpers::execute_command;

/// Reload all meetings and re-render the list. Returns the meeting count.
pub async fn reload_meetings(ctx: &DashboardContext) -> Result<usize> {
    execute_command("meetings::reload_meetings", || ctx.reload_meetings()).await
}

/// Open the detail view for a meeting
pub async fn open_meeting_detail(ctx: &DashboardContext, id: i64) -> Result<DetailSnapshot> {
    execute_command("meetings::open_meeting_detail", || ctx.open_detail(MeetingId(id))).await
}

pub fn close_meeting_detail(ctx: &DashboardContext) {
    ctx.close_detail();
}

/// Set the confirmation status by hand
///
/// # Arguments
/// * `id` - Meeting id
/// * `status` - `pending`, `confirmed` or `declined`
///
/// The request is sent once. Both outcomes also produce a notification.
pub async fn set_confirmation_status(
    ctx: &DashboardContext,
    id: i64,
    status: String,
) -> Result<()> {
    info!(meeting_id = id, %status, "Setting confirmation status");
    execute_command("meetings::set_confirmation_status", || {
        ctx.set_confirmation_status(MeetingId(id), &status)
    })
    .await
}

/// The meeting form saved a record; resync the list.
pub async fn meeting_saved(ctx: &DashboardContext, meeting: Meeting) -> Result<usize> {
    execute_command("meetings::meeting_saved", || ctx.meeting_saved(meeting)).await
}

/// A meeting was deleted; drop it and resync the list.
pub async fn meeting_deleted(ctx: &DashboardContext, id: i64) -> Result<usize> {
    execute_command("meetings::meeting_deleted", || ctx.meeting_deleted(MeetingId(id))).await
}

/// Pending toasts, oldest first. Each is returned once.
pub fn take_notifications(ctx: &DashboardContext) -> Vec<Notification> {
    ctx.drain_notifications()
}
