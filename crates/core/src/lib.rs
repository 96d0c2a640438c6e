//! # AgendaFlow Core
//!
//! Pure business logic layer - no HTTP, no rendering.
//!
//! This crate contains:
//! - Port interfaces (traits) for the backend and the UI surfaces
//! - [`MeetingStateStore`], the client-side meeting cache with a single
//!   mutation entry point
//! - [`ConnectivityGate`] and [`ChangeFetcher`], the fail-soft wrappers around
//!   the backend ports
//! - UI sync targets for the list and detail views
//! - [`ReconciliationEngine`], one polling cycle plus failure/backoff state
//! - [`MeetingActions`], user-initiated commands
//!
//! ## Architecture Principles
//! - Only depends on `agendaflow-common` and `agendaflow-domain`
//! - All external effects go through traits in [`ports`]
//! - Background errors are absorbed and logged; user actions propagate them

pub mod actions;
pub mod changes;
pub mod connectivity;
pub mod ports;
pub mod reconciliation;
pub mod store;
pub mod ui_sync;

pub use actions::MeetingActions;
pub use changes::{ChangeFetcher, FetchOutcome};
pub use connectivity::ConnectivityGate;
pub use ports::{
    ChangeFeed, ConnectivityProbe, DetailView, ListView, MeetingRepository, Notifier,
    StatusIndicator,
};
pub use reconciliation::{
    BackoffDecision, BackoffPolicy, CycleOutcome, EnginePorts, EngineSettings,
    ReconciliationEngine,
};
pub use store::{MeetingStateStore, MutationOutcome, ReloadTicket, StoreMutation};
pub use ui_sync::{
    CompositeUiSync, DetailSyncTarget, DetailViewTracker, ListSyncTarget, RefreshOutcome,
    UiSyncTarget,
};
