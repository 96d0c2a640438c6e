use agendaflow_core::ports::StatusIndicator;
use agendaflow_domain::{ConnectivityStatus, MonitoringStatus};
use parking_lot::RwLock;
use tracing::debug;

/// Holds the latest connection and monitoring widget state.
#[derive(Default)]
pub struct IndicatorState {
    connection: RwLock<Option<ConnectivityStatus>>,
    monitoring: RwLock<Option<MonitoringStatus>>,
}

impl IndicatorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self) -> Option<ConnectivityStatus> {
        self.connection.read().clone()
    }

    pub fn monitoring(&self) -> Option<MonitoringStatus> {
        self.monitoring.read().clone()
    }
}

impl StatusIndicator for IndicatorState {
    fn show_connection(&self, status: &ConnectivityStatus) {
        let mut current = self.connection.write();
        if current.as_ref() != Some(status) {
            debug!(linked = status.linked, message = %status.message, "connection indicator changed");
        }
        *current = Some(status.clone());
    }

    fn show_monitoring(&self, status: &MonitoringStatus) {
        let mut current = self.monitoring.write();
        if current.as_ref() != Some(status) {
            debug!(active = status.active, message = %status.message, "monitoring indicator changed");
        }
        *current = Some(status.clone());
    }
}
