//! # AgendaFlow Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The scheduling backend client, with retries for transient failures
//! - Wire DTOs and their validated conversion into domain types
//! - Backend adapters implementing the `agendaflow-core` ports
//! - Configuration loading (environment, `.env`, TOML/JSON files)
//! - The monitoring scheduler and its metrics
//! - In-memory view models, notifier and status indicator
//!
//! ## Architecture
//! - Implements traits defined in `agendaflow-core`
//! - Contains all "impure" code (I/O, timers)

pub mod adapters;
pub mod api;
pub mod config;
pub mod errors;
pub mod observability;
pub mod scheduling;
pub mod ui;

// Re-export commonly used items
pub use adapters::HttpBackend;
pub use errors::InfraError;
pub use scheduling::{MonitoringScheduler, MonitoringSchedulerConfig, SchedulerError};
