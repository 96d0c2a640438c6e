//! UI port implementations
//!
//! In-memory state the hosting page renders from, with `tracing` output
//! for every notification and indicator change.

mod indicator;
mod notifier;
pub mod views;

pub use indicator::IndicatorState;
pub use notifier::QueuedNotifier;
pub use views::{DetailSnapshot, InMemoryDetailView, InMemoryListView, StatusBadge};
