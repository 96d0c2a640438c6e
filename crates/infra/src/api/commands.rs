//! Typed backend operations
//!
//! One method per backend endpoint, returning domain types converted from
//! the wire DTOs in [`super::wire`].

use std::sync::Arc;
use std::time::Duration;

use agendaflow_domain::{
    ChangeRecord, ClientResponse, ConfirmationStatus, ConnectivityStatus, Meeting, MeetingId,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::Value;
use tracing::{debug, instrument};

use super::client::BackendClient;
use super::errors::ApiError;
use super::wire::{
    convert_all, ensure_success, AckResponse, ChangesResponse, ConfirmationRequest,
    ConnectivityResponse, MeetingEnvelope, ResponsesEnvelope, WireChange, WireMeeting,
    WireResponse,
};

const CONNECTIVITY_PATH: &str = "/connectivity/status";
const CHANGES_PATH: &str = "/changes";
const MEETINGS_PATH: &str = "/meetings";

/// Backend commands for the dashboard
pub struct BackendCommands {
    client: Arc<BackendClient>,
}

impl BackendCommands {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    /// WhatsApp link state, bounded by `timeout`.
    ///
    /// # Errors
    /// Returns error if the backend cannot be asked.
    #[instrument(skip(self))]
    pub async fn connectivity_status(
        &self,
        timeout: Duration,
    ) -> Result<ConnectivityStatus, ApiError> {
        let response: ConnectivityResponse =
            self.client.get_with_timeout(CONNECTIVITY_PATH, &[], timeout).await?;

        debug!(connected = response.connected, "connectivity fetched");
        Ok(response.into())
    }

    /// Status changes at or after `since`. Invalid records are skipped.
    ///
    /// # Errors
    /// Returns error on transport failure or `success: false`.
    #[instrument(skip(self), fields(since = %since))]
    pub async fn changes_since(&self, since: DateTime<Utc>) -> Result<Vec<ChangeRecord>, ApiError> {
        let query = [("since", since.to_rfc3339_opts(SecondsFormat::Secs, true))];
        let response: ChangesResponse = self.client.get_with_query(CHANGES_PATH, &query).await?;
        ensure_success(response.success, response.message, "change feed")?;

        let changes: Vec<ChangeRecord> = convert_all::<WireChange, _>(response.changes, "change");
        debug!(count = changes.len(), "changes fetched");
        Ok(changes)
    }

    /// Full meeting list. Invalid records are skipped.
    ///
    /// # Errors
    /// Returns error on transport or parse failure.
    #[instrument(skip(self))]
    pub async fn list_meetings(&self) -> Result<Vec<Meeting>, ApiError> {
        let records: Vec<Value> = self.client.get(MEETINGS_PATH).await?;
        let meetings: Vec<Meeting> = convert_all::<WireMeeting, _>(records, "meeting");

        debug!(count = meetings.len(), "meetings fetched");
        Ok(meetings)
    }

    /// # Errors
    /// [`ApiError::NotFound`] or [`ApiError::Rejected`] for an unknown id,
    /// [`ApiError::Malformed`] when the record fails validation.
    #[instrument(skip(self), fields(meeting_id = %id))]
    pub async fn get_meeting(&self, id: MeetingId) -> Result<Meeting, ApiError> {
        let path = format!("{MEETINGS_PATH}/{id}");
        let envelope: MeetingEnvelope = self.client.get(&path).await?;
        ensure_success(envelope.success, envelope.message, "meeting lookup")?;

        let record = envelope
            .meeting
            .ok_or_else(|| ApiError::Malformed(format!("meeting {id} missing from response")))?;
        Meeting::try_from(record)
    }

    /// Response history for a meeting.
    ///
    /// # Errors
    /// Returns error on transport failure or `success: false`.
    #[instrument(skip(self), fields(meeting_id = %id))]
    pub async fn list_responses(&self, id: MeetingId) -> Result<Vec<ClientResponse>, ApiError> {
        let path = format!("{MEETINGS_PATH}/{id}/responses");
        let envelope: ResponsesEnvelope = self.client.get(&path).await?;
        ensure_success(envelope.success, envelope.message, "response history")?;

        Ok(convert_all::<WireResponse, _>(envelope.responses, "response"))
    }

    /// Set the confirmation status by hand. Sent once.
    ///
    /// # Errors
    /// Returns error on transport failure; [`ApiError::Rejected`] carries
    /// the backend's message for `success: false`.
    #[instrument(skip(self), fields(meeting_id = %id, status = %status))]
    pub async fn set_confirmation_status(
        &self,
        id: MeetingId,
        status: ConfirmationStatus,
    ) -> Result<(), ApiError> {
        let path = format!("{MEETINGS_PATH}/{id}/confirmation");
        let ack: AckResponse = self.client.post(&path, &ConfirmationRequest { status }).await?;
        ensure_success(ack.success, ack.message, "status update")?;

        debug!("confirmation status accepted");
        Ok(())
    }
}
