//! # AgendaFlow App
//!
//! Application layer - commands and main entry point.
//!
//! This crate contains:
//! - Commands the hosting page calls (frontend → dashboard bridge)
//! - Dashboard context (dependency injection, one per view session)
//! - Logging bootstrap and the headless entry point
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod commands;
pub mod context;
pub mod utils;

// Re-export for convenience
pub use commands::*;
pub use context::*;
pub use utils::logging;
