//! Conversions from transport errors into domain errors.

use agendaflow_domain::AgendaError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub AgendaError);

impl From<InfraError> for AgendaError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<AgendaError> for InfraError {
    fn from(value: AgendaError) -> Self {
        Self(value)
    }
}

/// Makes the conversion explicit in tests and within this module.
trait IntoAgendaError {
    fn into_agenda(self) -> AgendaError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → AgendaError */
/* -------------------------------------------------------------------------- */

impl IntoAgendaError for HttpError {
    fn into_agenda(self) -> AgendaError {
        if self.is_timeout() {
            return AgendaError::Timeout("HTTP request timed out".into());
        }

        if self.is_connect() {
            return AgendaError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return AgendaError::MalformedResponse(format!("HTTP body could not be decoded: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => AgendaError::NotFound(message),
                400..=499 => AgendaError::InvalidInput(message),
                _ => AgendaError::Network(message),
            };
        }

        if self.is_builder() {
            return AgendaError::Config(format!("invalid HTTP request: {self}"));
        }

        AgendaError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_agenda())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
