//! # AgendaFlow Domain
//!
//! Business domain types for the AgendaFlow scheduling dashboard.
//!
//! This crate contains:
//! - Meeting records and confirmation statuses
//! - Change records and reconciliation cycle telemetry
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Domain constants (defaults, pt-BR UI messages)
//!
//! ## Architecture
//! - No dependencies on other AgendaFlow crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
