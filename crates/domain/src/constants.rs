//! Application constants
//!
//! Centralized location for domain-level defaults and the pt-BR strings the
//! dashboard shows to users.

// Backend defaults
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
pub const DEFAULT_CONNECTIVITY_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_MAX_ATTEMPTS: usize = 2;
pub const DEFAULT_USER_AGENT: &str = concat!("agendaflow/", env!("CARGO_PKG_VERSION"));

// Monitoring cadence
pub const DEFAULT_BASE_INTERVAL_MS: u64 = 5_000;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 2_000;
pub const DEFAULT_LOOKBACK_SECS: u64 = 300;
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
pub const DEFAULT_COOLDOWN_MS: u64 = 30_000;
pub const DEFAULT_BACKOFF_FACTOR: f64 = 1.5;
pub const DEFAULT_MAX_INTERVAL_MS: u64 = 120_000;
pub const DEFAULT_HEALTH_CHECK_INTERVAL_MS: u64 = 300_000;
pub const DEFAULT_HIGHLIGHT_MS: u64 = 1_500;

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Monitoring indicator messages
pub const MSG_WHATSAPP_DISCONNECTED: &str = "WhatsApp desconectado";
pub const MSG_MONITORING: &str = "Monitorando respostas...";
pub const MSG_MONITORING_PAUSED: &str = "Monitoramento pausado";
pub const MSG_MONITORING_STOPPED: &str = "Monitoramento parado";
pub const MSG_CONNECTIVITY_UNAVAILABLE: &str = "Erro ao verificar status";

// User action notifications
pub const MSG_STATUS_UPDATED: &str = "Status atualizado com sucesso!";
pub const MSG_STATUS_UPDATE_FAILED: &str = "Erro ao atualizar status";
pub const MSG_SUMMARY_PREFIX: &str = "Novas respostas processadas";
