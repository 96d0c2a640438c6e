use std::time::Duration;

use agendaflow_domain::{AgendaError, LoggingConfig, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `config.level` when it parses. Returns `Ok(false)`
/// when a subscriber is already installed (tests, embedding hosts).
///
/// # Errors
/// [`AgendaError::Config`] when `config.level` is not a valid filter
/// directive and `RUST_LOG` does not override it.
pub fn init_tracing(config: &LoggingConfig) -> Result<bool> {
    let filter = env_filter(&config.level)?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json { builder.json().try_init() } else { builder.try_init() };

    match installed {
        Ok(()) => {
            info!(level = %config.level, json = config.json, "tracing initialized");
            Ok(true)
        }
        Err(err) => {
            debug!(error = %err, "tracing subscriber already installed");
            Ok(false)
        }
    }
}

fn env_filter(default_directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(default_directive).map_err(|err| {
            AgendaError::Config(format!("invalid log level '{default_directive}': {err}"))
        })
    })
}

/// Log the outcome of a command execution with structured fields.
///
/// `command` should be a stable identifier such as
/// `"monitoring::force_update"`; never pass user data in it.
#[inline]
pub fn log_command_execution(command: &str, elapsed: Duration, error_type: Option<&str>) {
    let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

    match error_type {
        None => info!(command, duration_ms, "command_execution_success"),
        Some(error_type) => warn!(command, duration_ms, error_type, "command_execution_failure"),
    }
}
