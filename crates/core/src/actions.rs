//! User-initiated meeting commands
//!
//! Unlike the background engine, these propagate errors to the caller and
//! surface them as notifications.

use std::sync::Arc;

use agendaflow_common::SharedClock;
use agendaflow_domain::constants::{MSG_STATUS_UPDATED, MSG_STATUS_UPDATE_FAILED};
use agendaflow_domain::{
    AgendaError, ChangeRecord, ConfirmationStatus, Meeting, MeetingId, Notification, Result,
};
use tracing::{info, instrument, warn};

use crate::ports::{MeetingRepository, Notifier};
use crate::store::{MeetingStateStore, MutationOutcome, StoreMutation};
use crate::ui_sync::UiSyncTarget;

pub struct MeetingActions {
    repository: Arc<dyn MeetingRepository>,
    store: Arc<MeetingStateStore>,
    ui: Arc<dyn UiSyncTarget>,
    notifier: Arc<dyn Notifier>,
    clock: SharedClock,
}

impl MeetingActions {
    pub fn new(
        repository: Arc<dyn MeetingRepository>,
        store: Arc<MeetingStateStore>,
        ui: Arc<dyn UiSyncTarget>,
        notifier: Arc<dyn Notifier>,
        clock: SharedClock,
    ) -> Self {
        Self { repository, store, ui, notifier, clock }
    }

    /// Set a meeting's confirmation status by hand.
    ///
    /// Only `pending`, `confirmed` and `declined` can be set manually. The
    /// request is sent once; a failure is returned and notified, never
    /// retried.
    ///
    /// # Errors
    /// [`AgendaError::InvalidInput`] for a status the user cannot pick, or the
    /// backend/transport error of the POST.
    #[instrument(skip(self))]
    pub async fn set_confirmation_status(
        &self,
        id: MeetingId,
        status: ConfirmationStatus,
    ) -> Result<()> {
        if !status.is_manually_settable() {
            return Err(AgendaError::InvalidInput(format!(
                "status '{status}' cannot be set manually"
            )));
        }

        if let Err(err) = self.repository.set_confirmation_status(id, status).await {
            warn!(meeting_id = %id, error = %err, "manual status update failed");
            let message = format!("{MSG_STATUS_UPDATE_FAILED}: {err}");
            self.notifier.notify(&Notification::error(message));
            return Err(err);
        }

        let change = ChangeRecord::new(id, status, self.clock.utc_now());
        self.store.apply_change(&change);

        if let Err(err) = self.store.reload(self.repository.as_ref()).await {
            warn!(meeting_id = %id, error = %err, "reload after status update failed");
        }

        if let Some(meeting) = self.store.get(id) {
            self.ui.refresh(id, &meeting).await;
        }

        info!(meeting_id = %id, status = %status, "confirmation status set manually");
        self.notifier.notify(&Notification::success(MSG_STATUS_UPDATED));
        Ok(())
    }

    /// Full reload through the store. Returns the number of meetings held
    /// afterwards.
    ///
    /// # Errors
    /// Propagates the list fetch error.
    #[instrument(skip(self))]
    pub async fn reload_meetings(&self) -> Result<usize> {
        let outcome = self.store.reload(self.repository.as_ref()).await?;
        if outcome == MutationOutcome::StaleReloadDiscarded {
            info!("reload superseded by a newer snapshot");
        }
        Ok(self.store.len())
    }

    /// Record a meeting the user just saved, then resync with the backend.
    ///
    /// # Errors
    /// Propagates the reload error; the saved record stays in the store.
    pub async fn record_saved(&self, meeting: Meeting) -> Result<usize> {
        let id = meeting.id;
        self.store.apply(StoreMutation::Upsert(meeting));
        let count = self.reload_meetings().await?;
        if let Some(meeting) = self.store.get(id) {
            self.ui.refresh(id, &meeting).await;
        }
        Ok(count)
    }

    /// Drop a meeting the user just deleted, then resync with the backend.
    ///
    /// # Errors
    /// Propagates the reload error.
    pub async fn record_deleted(&self, id: MeetingId) -> Result<usize> {
        self.store.apply(StoreMutation::Remove(id));
        self.reload_meetings().await
    }
}
