//! HTTP implementation of the backend ports

use std::sync::Arc;
use std::time::Duration;

use agendaflow_core::ports::{ChangeFeed, ConnectivityProbe, MeetingRepository};
use agendaflow_domain::{
    BackendConfig, ChangeRecord, ClientResponse, ConfirmationStatus, ConnectivityStatus, Meeting,
    MeetingId, Result,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::api::{BackendClient, BackendClientConfig, BackendCommands};

/// Backend ports over [`BackendCommands`]. Errors cross the port boundary
/// as [`AgendaError`](agendaflow_domain::AgendaError).
pub struct HttpBackend {
    commands: BackendCommands,
    connectivity_timeout: Duration,
}

impl HttpBackend {
    pub const fn new(commands: BackendCommands, connectivity_timeout: Duration) -> Self {
        Self { commands, connectivity_timeout }
    }

    /// Build the client stack from configuration.
    ///
    /// # Errors
    /// [`AgendaError::Config`](agendaflow_domain::AgendaError::Config) for an
    /// invalid base URL.
    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        let client = BackendClient::new(BackendClientConfig::from(config))?;
        Ok(Self::new(BackendCommands::new(Arc::new(client)), config.connectivity_timeout()))
    }
}

#[async_trait]
impl ConnectivityProbe for HttpBackend {
    async fn connectivity_status(&self) -> Result<ConnectivityStatus> {
        Ok(self.commands.connectivity_status(self.connectivity_timeout).await?)
    }
}

#[async_trait]
impl ChangeFeed for HttpBackend {
    async fn changes_since(&self, since: DateTime<Utc>) -> Result<Vec<ChangeRecord>> {
        Ok(self.commands.changes_since(since).await?)
    }
}

#[async_trait]
impl MeetingRepository for HttpBackend {
    async fn list_meetings(&self) -> Result<Vec<Meeting>> {
        Ok(self.commands.list_meetings().await?)
    }

    async fn get_meeting(&self, id: MeetingId) -> Result<Meeting> {
        Ok(self.commands.get_meeting(id).await?)
    }

    async fn list_responses(&self, id: MeetingId) -> Result<Vec<ClientResponse>> {
        Ok(self.commands.list_responses(id).await?)
    }

    async fn set_confirmation_status(
        &self,
        id: MeetingId,
        status: ConfirmationStatus,
    ) -> Result<()> {
        Ok(self.commands.set_confirmation_status(id, status).await?)
    }
}
