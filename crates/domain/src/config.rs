//! Configuration structures
//!
//! Every field carries a default so partial TOML/JSON files and environment
//! overrides compose cleanly.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BACKEND_URL, DEFAULT_BACKOFF_FACTOR, DEFAULT_BASE_INTERVAL_MS,
    DEFAULT_CONNECTIVITY_TIMEOUT_MS, DEFAULT_COOLDOWN_MS, DEFAULT_FAILURE_THRESHOLD,
    DEFAULT_HEALTH_CHECK_INTERVAL_MS, DEFAULT_HIGHLIGHT_MS, DEFAULT_INITIAL_DELAY_MS,
    DEFAULT_LOG_LEVEL, DEFAULT_LOOKBACK_SECS, DEFAULT_MAX_ATTEMPTS, DEFAULT_MAX_INTERVAL_MS,
    DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_USER_AGENT,
};
use crate::{AgendaError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub monitoring: MonitoringConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Reject configurations the engine cannot run with.
    ///
    /// # Errors
    /// Returns [`AgendaError::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        self.backend.validate()?;
        self.monitoring.validate()
    }
}

/// Backend HTTP settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub request_timeout_ms: u64,
    pub connectivity_timeout_ms: u64,
    /// Total attempts for idempotent GETs (POSTs are always sent once).
    pub max_attempts: usize,
    pub user_agent: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            connectivity_timeout_ms: DEFAULT_CONNECTIVITY_TIMEOUT_MS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl BackendConfig {
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub const fn connectivity_timeout(&self) -> Duration {
        Duration::from_millis(self.connectivity_timeout_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(AgendaError::Config("backend.base_url must not be empty".into()));
        }
        if self.request_timeout_ms == 0 {
            return Err(AgendaError::Config("backend.request_timeout_ms must be > 0".into()));
        }
        if self.connectivity_timeout_ms == 0 {
            return Err(AgendaError::Config("backend.connectivity_timeout_ms must be > 0".into()));
        }
        if self.max_attempts == 0 {
            return Err(AgendaError::Config("backend.max_attempts must be >= 1".into()));
        }
        Ok(())
    }
}

/// Reconciliation cadence, backoff and health-check settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub base_interval_ms: u64,
    pub initial_delay_ms: u64,
    /// Rolling lookback for the change feed (`since = now - lookback`).
    pub lookback_secs: u64,
    pub failure_threshold: u32,
    pub cooldown_ms: u64,
    pub backoff_factor: f64,
    pub max_interval_ms: u64,
    pub health_check_interval_ms: u64,
    pub highlight_ms: u64,
    pub enabled: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: DEFAULT_BASE_INTERVAL_MS,
            initial_delay_ms: DEFAULT_INITIAL_DELAY_MS,
            lookback_secs: DEFAULT_LOOKBACK_SECS,
            failure_threshold: DEFAULT_FAILURE_THRESHOLD,
            cooldown_ms: DEFAULT_COOLDOWN_MS,
            backoff_factor: DEFAULT_BACKOFF_FACTOR,
            max_interval_ms: DEFAULT_MAX_INTERVAL_MS,
            health_check_interval_ms: DEFAULT_HEALTH_CHECK_INTERVAL_MS,
            highlight_ms: DEFAULT_HIGHLIGHT_MS,
            enabled: true,
        }
    }
}

impl MonitoringConfig {
    pub const fn base_interval(&self) -> Duration {
        Duration::from_millis(self.base_interval_ms)
    }

    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    pub const fn lookback(&self) -> Duration {
        Duration::from_secs(self.lookback_secs)
    }

    pub const fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }

    pub const fn max_interval(&self) -> Duration {
        Duration::from_millis(self.max_interval_ms)
    }

    pub const fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms)
    }

    pub const fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.base_interval_ms == 0 {
            return Err(AgendaError::Config("monitoring.base_interval_ms must be > 0".into()));
        }
        if self.health_check_interval_ms == 0 {
            return Err(AgendaError::Config(
                "monitoring.health_check_interval_ms must be > 0".into(),
            ));
        }
        if self.failure_threshold == 0 {
            return Err(AgendaError::Config("monitoring.failure_threshold must be >= 1".into()));
        }
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(AgendaError::Config(format!(
                "monitoring.backoff_factor must be >= 1.0, got {}",
                self.backoff_factor
            )));
        }
        if self.max_interval_ms < self.base_interval_ms {
            return Err(AgendaError::Config(format!(
                "monitoring.max_interval_ms ({}) must be >= base_interval_ms ({})",
                self.max_interval_ms, self.base_interval_ms
            )));
        }
        Ok(())
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string(), json: false }
    }
}
