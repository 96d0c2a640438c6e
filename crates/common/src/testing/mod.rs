//! Testing utilities and helpers
//!
//! - **[`async_utils`]**: `assert_eventually_async!`, `timeout_ok`, `poll_until`
//! - **[`time`]**: [`MockClock`] for deterministic wall-clock control
//!
//! ## Usage
//!
//! ```rust
//! use std::time::Duration;
//!
//! use agendaflow_common::testing::MockClock;
//! use agendaflow_common::Clock;
//!
//! let clock = MockClock::new();
//! let before = clock.utc_now();
//! clock.advance(Duration::from_secs(300));
//! assert_eq!((clock.utc_now() - before).num_seconds(), 300);
//! ```

pub mod async_utils;
pub mod time;

pub use async_utils::{poll_until, timeout_ok};
pub use time::MockClock;
