//! Failure backoff policy

use std::time::Duration;

use agendaflow_domain::MonitoringConfig;

/// Cadence adaptation after repeated cycle failures.
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    pub base: Duration,
    pub factor: f64,
    pub max: Duration,
    /// Consecutive failures that trigger a pause.
    pub threshold: u32,
    pub cooldown: Duration,
}

/// Returned by a failing cycle once the threshold is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackoffDecision {
    /// How long the scheduler pauses before the next cycle.
    pub cooldown: Duration,
    /// Interval the scheduler resumes with.
    pub next_interval: Duration,
}

impl BackoffPolicy {
    pub fn from_config(config: &MonitoringConfig) -> Self {
        Self {
            base: config.base_interval(),
            factor: config.backoff_factor,
            max: config.max_interval(),
            threshold: config.failure_threshold,
            cooldown: config.cooldown(),
        }
    }

    pub const fn should_pause(&self, consecutive_failures: u32) -> bool {
        consecutive_failures >= self.threshold
    }

    /// `current * factor`, clamped to `[base, max]`.
    pub fn next_interval(&self, current: Duration) -> Duration {
        let scaled = Duration::try_from_secs_f64(current.as_secs_f64() * self.factor)
            .unwrap_or(self.max);
        scaled.min(self.max).max(self.base)
    }

    pub fn decide(&self, current: Duration) -> BackoffDecision {
        BackoffDecision { cooldown: self.cooldown, next_interval: self.next_interval(current) }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from_config(&MonitoringConfig::default())
    }
}
