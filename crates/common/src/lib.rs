//! Common utilities shared across AgendaFlow crates.
//!
//! # Feature Tiers
//!
//! - default: the [`time`] clock abstraction (no async runtime)
//! - `runtime`: tokio-backed helpers
//! - `test-utils`: [`testing`] helpers (`MockClock`, async assertions)

#![forbid(unsafe_code)]

pub mod time;

#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use time::{Clock, SharedClock, SystemClock};
