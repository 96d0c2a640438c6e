//! Backend wire format
//!
//! DTOs for the scheduling backend's JSON and their validated conversion
//! into domain types. Field names accept both the English names and the
//! backend's legacy Portuguese keys. The backend sends `""` for missing
//! values, which maps to `None`.
//!
//! Batch envelopes keep their records as raw JSON. Each record is decoded
//! and validated on its own, so a record that fails (null or missing
//! field, unknown status, unparseable timestamp) is dropped with a warning
//! and the rest of the batch is kept.

use agendaflow_domain::{
    ChangeRecord, ClientResponse, ConfirmationStatus, ConnectivityStatus, Meeting, MeetingId,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::errors::ApiError;

/* -------------------------------------------------------------------------- */
/* Envelopes */
/* -------------------------------------------------------------------------- */

/// `GET /connectivity/status`
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectivityResponse {
    pub connected: bool,
    #[serde(default)]
    pub status_message: String,
}

impl From<ConnectivityResponse> for ConnectivityStatus {
    fn from(value: ConnectivityResponse) -> Self {
        if value.connected {
            Self::linked(value.status_message)
        } else {
            Self::unlinked(value.status_message)
        }
    }
}

/// `GET /changes?since=`
#[derive(Debug, Clone, Deserialize)]
pub struct ChangesResponse {
    pub success: bool,
    /// Raw [`WireChange`] records
    #[serde(default)]
    pub changes: Vec<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /meetings/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct MeetingEnvelope {
    pub success: bool,
    #[serde(default)]
    pub meeting: Option<WireMeeting>,
    #[serde(default)]
    pub message: Option<String>,
}

/// `GET /meetings/{id}/responses`
#[derive(Debug, Clone, Deserialize)]
pub struct ResponsesEnvelope {
    pub success: bool,
    /// Raw [`WireResponse`] records
    #[serde(default)]
    pub responses: Vec<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of `POST /meetings/{id}/confirmation`
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationRequest {
    pub status: ConfirmationStatus,
}

/// Generic `{success, message?}` acknowledgement
#[derive(Debug, Clone, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

/// Turn a `success: false` envelope into [`ApiError::Rejected`].
pub fn ensure_success(success: bool, message: Option<String>, what: &str) -> Result<(), ApiError> {
    if success {
        Ok(())
    } else {
        Err(ApiError::Rejected(
            message.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| format!("{what} failed")),
        ))
    }
}

/* -------------------------------------------------------------------------- */
/* Records */
/* -------------------------------------------------------------------------- */

#[derive(Debug, Clone, Deserialize)]
pub struct WireChange {
    pub meeting_id: i64,
    #[serde(alias = "current_status")]
    pub status: String,
    #[serde(alias = "received_at")]
    pub updated_at: String,
}

impl TryFrom<WireChange> for ChangeRecord {
    type Error = ApiError;

    fn try_from(value: WireChange) -> Result<Self, Self::Error> {
        Ok(Self::new(
            MeetingId(value.meeting_id),
            parse_status(&value.status)?,
            parse_timestamp(&value.updated_at)?,
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireMeeting {
    pub id: i64,
    #[serde(default, alias = "titulo")]
    pub title: Option<String>,
    #[serde(default, alias = "convidado")]
    pub guest: Option<String>,
    #[serde(default, alias = "assunto")]
    pub subject: Option<String>,
    #[serde(default)]
    pub client: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "local")]
    pub location: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    pub datetime: String,
    #[serde(default, alias = "status_confirmacao")]
    pub confirmation_status: Option<String>,
    #[serde(default, alias = "numero_pessoas")]
    pub number_of_people: Option<Value>,
    #[serde(default)]
    pub status_updated_at: Option<String>,
}

impl TryFrom<WireMeeting> for Meeting {
    type Error = ApiError;

    fn try_from(value: WireMeeting) -> Result<Self, Self::Error> {
        let confirmation_status = match non_empty(value.confirmation_status) {
            Some(raw) => parse_status(&raw)?,
            None => ConfirmationStatus::Pending,
        };
        let status_updated_at =
            non_empty(value.status_updated_at).map(|raw| parse_timestamp(&raw)).transpose()?;

        Ok(Self {
            id: MeetingId(value.id),
            title: non_empty(value.title),
            guest: non_empty(value.guest),
            subject: non_empty(value.subject),
            client: non_empty(value.client),
            phone: non_empty(value.phone),
            location: non_empty(value.location),
            link: non_empty(value.link),
            datetime: parse_timestamp(&value.datetime)?,
            confirmation_status,
            number_of_people: parse_people(value.number_of_people.as_ref()),
            status_updated_at,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireResponse {
    pub status: String,
    #[serde(default)]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub response_text: Option<String>,
    #[serde(default)]
    pub received_at: Option<String>,
}

impl TryFrom<WireResponse> for ClientResponse {
    type Error = ApiError;

    fn try_from(value: WireResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            status: parse_status(&value.status)?,
            confidence: value.confidence,
            response_text: non_empty(value.response_text),
            received_at: non_empty(value.received_at).map(|raw| parse_timestamp(&raw)).transpose()?,
        })
    }
}

/// Decode and convert every raw record, dropping (and logging) the ones
/// that fail either step.
pub fn convert_all<W, D>(records: Vec<Value>, kind: &'static str) -> Vec<D>
where
    W: DeserializeOwned,
    D: TryFrom<W, Error = ApiError>,
{
    let total = records.len();
    let converted: Vec<D> = records
        .into_iter()
        .filter_map(|record| match convert_one::<W, D>(record) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(kind, error = %err, "skipping invalid backend record");
                None
            }
        })
        .collect();

    if converted.len() < total {
        warn!(kind, total, kept = converted.len(), "backend batch contained invalid records");
    }
    converted
}

fn convert_one<W, D>(record: Value) -> Result<D, ApiError>
where
    W: DeserializeOwned,
    D: TryFrom<W, Error = ApiError>,
{
    let wire: W = serde_json::from_value(record)
        .map_err(|e| ApiError::Malformed(format!("invalid record: {e}")))?;
    D::try_from(wire)
}

/* -------------------------------------------------------------------------- */
/* Field parsing */
/* -------------------------------------------------------------------------- */

fn parse_status(raw: &str) -> Result<ConfirmationStatus, ApiError> {
    raw.parse().map_err(|_| ApiError::Malformed(format!("unknown confirmation status '{raw}'")))
}

const NAIVE_FORMATS: [&str; 4] =
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M"];

/// RFC 3339, or a naive local timestamp which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ApiError::Malformed(format!("invalid timestamp '{raw}'")))
}

fn parse_people(value: Option<&Value>) -> Option<u32> {
    let count = match value? {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }?;
    u32::try_from(count).ok().filter(|count| *count > 0)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}
