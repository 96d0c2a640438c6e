//! WhatsApp connectivity gate
//!
//! Wraps the [`ConnectivityProbe`] port with a hard timeout and fails open to
//! "not linked": callers always get a [`ConnectivityStatus`], never an error.

use std::sync::Arc;
use std::time::Duration;

use agendaflow_domain::constants::MSG_CONNECTIVITY_UNAVAILABLE;
use agendaflow_domain::ConnectivityStatus;
use tracing::{debug, instrument, warn};

use crate::ports::{ConnectivityProbe, StatusIndicator};

pub struct ConnectivityGate {
    probe: Arc<dyn ConnectivityProbe>,
    indicator: Arc<dyn StatusIndicator>,
    timeout: Duration,
}

impl ConnectivityGate {
    pub fn new(
        probe: Arc<dyn ConnectivityProbe>,
        indicator: Arc<dyn StatusIndicator>,
        timeout: Duration,
    ) -> Self {
        Self { probe, indicator, timeout }
    }

    /// Ask the backend whether the WhatsApp link is up and publish the
    /// result to the connection widget.
    #[instrument(skip(self))]
    pub async fn check_linked(&self) -> ConnectivityStatus {
        let status =
            match tokio::time::timeout(self.timeout, self.probe.connectivity_status()).await {
                Ok(Ok(status)) => status,
                Ok(Err(err)) => {
                    warn!(error = %err, "connectivity check failed");
                    ConnectivityStatus::unreachable(MSG_CONNECTIVITY_UNAVAILABLE)
                }
                Err(_) => {
                    warn!(timeout_ms = self.timeout.as_millis(), "connectivity check timed out");
                    ConnectivityStatus::unreachable(MSG_CONNECTIVITY_UNAVAILABLE)
                }
            };

        debug!(linked = status.linked, reachable = status.reachable, "connectivity checked");
        self.indicator.show_connection(&status);
        status
    }
}
