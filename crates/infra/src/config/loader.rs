//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. Reads a `.env` file into the environment, if one exists
//! 2. Attempts to load from environment variables
//! 3. If `AGENDAFLOW_BACKEND_URL` is missing, falls back to a config file
//! 4. Probes multiple paths for config files (JSON and TOML)
//!
//! Every loaded configuration is validated before it is returned.
//!
//! ## Environment Variables
//! - `AGENDAFLOW_BACKEND_URL`: Backend base URL (required)
//! - `AGENDAFLOW_REQUEST_TIMEOUT_MS`: Per-call timeout
//! - `AGENDAFLOW_CONNECTIVITY_TIMEOUT_MS`: Connectivity check timeout
//! - `AGENDAFLOW_MAX_ATTEMPTS`: Attempts per GET request
//! - `AGENDAFLOW_BASE_INTERVAL_MS`: Polling cadence
//! - `AGENDAFLOW_INITIAL_DELAY_MS`: Delay before the first cycle
//! - `AGENDAFLOW_LOOKBACK_SECS`: Change feed lookback window
//! - `AGENDAFLOW_FAILURE_THRESHOLD`: Failures before cooling down
//! - `AGENDAFLOW_COOLDOWN_MS`: Cooldown after the threshold is hit
//! - `AGENDAFLOW_BACKOFF_FACTOR`: Cadence multiplier after a cooldown
//! - `AGENDAFLOW_MAX_INTERVAL_MS`: Cadence ceiling
//! - `AGENDAFLOW_HEALTH_CHECK_INTERVAL_MS`: Health check period
//! - `AGENDAFLOW_MONITORING_ENABLED`: Start monitoring automatically
//!   (true/false)
//! - `AGENDAFLOW_LOG_LEVEL`: Default log filter
//! - `AGENDAFLOW_LOG_JSON`: JSON log output (true/false)
//!
//! Unset optional variables keep their defaults.
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./agendaflow.toml` or `./agendaflow.json` (current working directory)
//! 2. `./config.toml` or `./config.json` (current working directory)
//! 3. The same names in the parent and grandparent directories
//! 4. Relative to executable location

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use agendaflow_domain::{AgendaError, Config, Result};

const CONFIG_FILE_NAMES: [&str; 4] =
    ["agendaflow.toml", "agendaflow.json", "config.toml", "config.json"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `AgendaError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - The result fails validation
pub fn load() -> Result<Config> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Ignoring unreadable .env file"),
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `AGENDAFLOW_BACKEND_URL` must be set; everything else is optional.
///
/// # Errors
/// Returns `AgendaError::Config` if the backend URL is missing, a value does
/// not parse, or the result fails validation.
pub fn load_from_env() -> Result<Config> {
    let mut config = Config::default();

    config.backend.base_url = env_var("AGENDAFLOW_BACKEND_URL")?;
    config.backend.request_timeout_ms =
        env_parse("AGENDAFLOW_REQUEST_TIMEOUT_MS", config.backend.request_timeout_ms)?;
    config.backend.connectivity_timeout_ms =
        env_parse("AGENDAFLOW_CONNECTIVITY_TIMEOUT_MS", config.backend.connectivity_timeout_ms)?;
    config.backend.max_attempts = env_parse("AGENDAFLOW_MAX_ATTEMPTS", config.backend.max_attempts)?;

    let monitoring = &mut config.monitoring;
    monitoring.base_interval_ms =
        env_parse("AGENDAFLOW_BASE_INTERVAL_MS", monitoring.base_interval_ms)?;
    monitoring.initial_delay_ms =
        env_parse("AGENDAFLOW_INITIAL_DELAY_MS", monitoring.initial_delay_ms)?;
    monitoring.lookback_secs = env_parse("AGENDAFLOW_LOOKBACK_SECS", monitoring.lookback_secs)?;
    monitoring.failure_threshold =
        env_parse("AGENDAFLOW_FAILURE_THRESHOLD", monitoring.failure_threshold)?;
    monitoring.cooldown_ms = env_parse("AGENDAFLOW_COOLDOWN_MS", monitoring.cooldown_ms)?;
    monitoring.backoff_factor = env_parse("AGENDAFLOW_BACKOFF_FACTOR", monitoring.backoff_factor)?;
    monitoring.max_interval_ms =
        env_parse("AGENDAFLOW_MAX_INTERVAL_MS", monitoring.max_interval_ms)?;
    monitoring.health_check_interval_ms =
        env_parse("AGENDAFLOW_HEALTH_CHECK_INTERVAL_MS", monitoring.health_check_interval_ms)?;
    monitoring.enabled = env_bool("AGENDAFLOW_MONITORING_ENABLED", monitoring.enabled);

    if let Ok(level) = std::env::var("AGENDAFLOW_LOG_LEVEL") {
        config.logging.level = level;
    }
    config.logging.json = env_bool("AGENDAFLOW_LOG_JSON", config.logging.json);

    config.validate()?;
    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
/// Missing fields keep their defaults.
///
/// # Errors
/// Returns `AgendaError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - The result fails validation
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(AgendaError::Config(format!("Config file not found: {}", p.display())));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            AgendaError::Config("No config file found in any of the standard locations".to_string())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| AgendaError::Config(format!("Failed to read config file: {e}")))?;

    let config = parse_config(&contents, &config_path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| AgendaError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| AgendaError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(AgendaError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the current working directory, its parent and grandparent, then
/// the same three levels from the executable's directory.
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut roots = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        roots.push(cwd);
    }

    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        roots.push(exe_dir);
    }

    roots
        .iter()
        .flat_map(|root| [root.clone(), root.join(".."), root.join("../..")])
        .flat_map(|dir| CONFIG_FILE_NAMES.map(|name| dir.join(name)))
        .find(|path| path.exists())
}

/// Get required environment variable
fn env_var(key: &str) -> Result<String> {
    std::env::var(key)
        .map_err(|_| AgendaError::Config(format!("Missing required environment variable: {key}")))
}

/// Parse an optional environment variable, keeping `default` when unset
fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AgendaError::Config(format!("Invalid value for {key} ('{raw}'): {e}"))),
        Err(_) => Ok(default),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map_or(default, |s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
}
