//! Scheduling backend API
//!
//! HTTP client and typed operations for the dashboard backend.
//!
//! # Architecture
//!
//! - [`BackendClient`] owns the reqwest client (no direct reqwest use above
//!   this layer)
//! - Hard timeout on every call; GETs retry transient failures, POSTs are
//!   sent once
//! - [`wire`] validates backend JSON; invalid records are skipped, never
//!   guessed
//! - [`BackendCommands`] exposes one method per endpoint

pub mod client;
pub mod commands;
pub mod errors;
pub mod wire;

pub use client::{BackendClient, BackendClientConfig};
pub use commands::BackendCommands;
pub use errors::{ApiError, ApiErrorCategory};
