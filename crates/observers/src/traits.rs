//! Capability traits for reusable observers.
//!
//! These traits abstract over loop-specific event and action types, so the
//! sinks and loggers in this crate only depend on what they actually read
//! from an event.
//!
//! # Event traits
//!
//! - [`HasRecord`]: events that carry a flattened tick record
//! - [`HasRunResult`]: events that mark the end of a run
//!
//! # Action traits
//!
//! - [`CanAbort`]: actions that can stop a run
//!
//! # Example
//!
//! ```rust
//! use keel_core::Observer;
//! use keel_observers::traits::{CanAbort, HasRecord};
//!
//! struct SpeedLimit {
//!     max_speed: f64,
//! }
//!
//! impl<E: HasRecord, A: CanAbort> Observer<E, A> for SpeedLimit {
//!     fn observe(&mut self, event: &E) -> Option<A> {
//!         let record = event.record()?;
//!         (record.get("speed") > self.max_speed).then(|| A::abort("speed limit exceeded"))
//!     }
//! }
//! ```

use keel_core::{Record, RuntimeAbort};
use keel_solvers::simulation::{Action, Event, RunResult};

/// An event that may carry a tick record.
pub trait HasRecord {
    /// Returns the tick record, or `None` for events without one.
    fn record(&self) -> Option<&Record>;
}

/// An event that may mark the end of a run.
pub trait HasRunResult {
    /// Returns the run result if this event ends the run.
    fn run_result(&self) -> Option<&RunResult>;
}

/// An action type that can stop a run.
pub trait CanAbort {
    /// Returns the action that aborts the run with `reason`.
    fn abort(reason: impl Into<String>) -> Self;
}

impl HasRecord for Event {
    fn record(&self) -> Option<&Record> {
        match self {
            Event::Tick { record, .. } => Some(record),
            Event::Stream { .. } | Event::Finished(_) => None,
        }
    }
}

impl HasRunResult for Event {
    fn run_result(&self) -> Option<&RunResult> {
        match self {
            Event::Finished(result) => Some(result),
            Event::Tick { .. } | Event::Stream { .. } => None,
        }
    }
}

impl CanAbort for Action {
    fn abort(reason: impl Into<String>) -> Self {
        Self::Abort(RuntimeAbort::new(reason))
    }
}
