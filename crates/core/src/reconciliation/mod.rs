//! Reconciliation engine
//!
//! One cycle is `connectivity -> fetch changes -> full reload -> UI sync`.
//! The engine owns the failure counter and the current cadence; timers live
//! in the infrastructure scheduler, which drives [`ReconciliationEngine`].

mod backoff;
mod engine;
mod ledger;

pub use backoff::{BackoffDecision, BackoffPolicy};
pub use engine::{CycleOutcome, EnginePorts, EngineSettings, ReconciliationEngine};
