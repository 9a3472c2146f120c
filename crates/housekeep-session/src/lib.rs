//! Scan-session orchestration for housekeep.
//!
//! This crate decides whether a path is safe to watch, gates scans by their
//! estimated cost, runs each scan against a deadline, supports cancellation,
//! and recovers from invalid paths, timeouts, and emergency resets. Every
//! external effect goes through the collaborator traits in `housekeep-core`.

mod actions;
mod error;
mod executor;
mod gate;
mod intent;
mod orchestrator;
mod recovery;
mod state;

pub use actions::DeleteOutcome;
pub use error::FailureKind;
pub use executor::ScanExecutor;
pub use gate::{GateDecision, RejectReason, ValidationGate};
pub use intent::{Intent, TRIGGER_SCAN_SIGNAL};
pub use orchestrator::{Orchestrator, Services};
pub use state::{GateStep, ScanSession, ScanTicket, SessionPhase, SessionState};
