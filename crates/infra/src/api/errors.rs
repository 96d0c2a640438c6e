//! Backend API error types
//!
//! Classifies backend failures so the engine can tell transient transport
//! problems from answers it should not retry.

use std::time::Duration;

use agendaflow_domain::AgendaError;
use thiserror::Error;

/// Categories of backend API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCategory {
    /// Session expired or login required (401, 403)
    Authentication,
    /// Rate limiting (429)
    RateLimit,
    /// Server errors (5xx)
    Server,
    /// Client errors (4xx except auth)
    Client,
    /// Network/connection errors and timeouts
    Network,
    /// The backend answered but the payload was unusable or a refusal
    Response,
    /// Configuration errors
    Config,
}

/// Backend API operation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Client error: {0}")]
    Client(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Well-formed answer with `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub const fn category(&self) -> ApiErrorCategory {
        match self {
            Self::Unauthorized(_) => ApiErrorCategory::Authentication,
            Self::RateLimit(_) => ApiErrorCategory::RateLimit,
            Self::Server(_) => ApiErrorCategory::Server,
            Self::NotFound(_) | Self::Client(_) => ApiErrorCategory::Client,
            Self::Network(_) | Self::Timeout(_) => ApiErrorCategory::Network,
            Self::Malformed(_) | Self::Rejected(_) => ApiErrorCategory::Response,
            Self::Config(_) => ApiErrorCategory::Config,
        }
    }

    /// Whether the next polling cycle may succeed where this one failed.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self.category(),
            ApiErrorCategory::RateLimit | ApiErrorCategory::Server | ApiErrorCategory::Network
        )
    }

    /// Map a transport failure, already classified as [`AgendaError`].
    pub(crate) fn from_transport(err: AgendaError, timeout: Duration) -> Self {
        match err {
            AgendaError::Timeout(_) => Self::Timeout(timeout),
            AgendaError::NotFound(msg) => Self::NotFound(msg),
            AgendaError::InvalidInput(msg) => Self::Client(msg),
            AgendaError::MalformedResponse(msg) => Self::Malformed(msg),
            AgendaError::Config(msg) => Self::Config(msg),
            AgendaError::Backend(msg) => Self::Rejected(msg),
            AgendaError::Network(msg) | AgendaError::Internal(msg) => Self::Network(msg),
        }
    }
}

impl From<ApiError> for AgendaError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Timeout(duration) => Self::Timeout(format!("no response within {duration:?}")),
            ApiError::Network(msg) => Self::Network(msg),
            ApiError::Server(msg) | ApiError::RateLimit(msg) => Self::Network(msg),
            ApiError::NotFound(msg) => Self::NotFound(msg),
            ApiError::Client(msg) => Self::InvalidInput(msg),
            ApiError::Malformed(msg) => Self::MalformedResponse(msg),
            ApiError::Unauthorized(msg) | ApiError::Rejected(msg) => Self::Backend(msg),
            ApiError::Config(msg) => Self::Config(msg),
        }
    }
}
