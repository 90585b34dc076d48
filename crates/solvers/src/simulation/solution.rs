use keel_core::{Bound, NumericalInstability, RuntimeAbort, VesselState};
use serde::Serialize;
use thiserror::Error;

use super::PerformanceMetrics;

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Reached `t_end` with no termination reason.
    Completed,

    /// Stopped early; the run result carries the reason.
    Terminated,
}

/// Why a run terminated early.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerminationReason {
    #[error("solver_failed: {0}")]
    SolverFailed(String),

    /// The solver returned without advancing by the minimal step.
    #[error("solver_stagnation_internal")]
    SolverStagnationInternal,

    /// The segment itself was shorter than the minimal step.
    #[error("solver_stagnation_no_time_advance")]
    SolverStagnationNoTimeAdvance,

    #[error("solver_no_output")]
    SolverNoOutput,

    #[error("numerical_instability: {0}")]
    NumericalInstability(NumericalInstability),

    #[error("{0}")]
    OutOfBounds(Bound),

    #[error("{0}")]
    Aborted(RuntimeAbort),
}

/// The outcome of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub status: Status,
    /// Present only when terminated.
    pub reason: Option<TerminationReason>,
    /// Time of the last accepted state [s].
    pub end_time: f64,
    /// Number of accepted segments.
    pub ticks: usize,
    pub dt: f64,
    /// Last valid state.
    pub final_state: VesselState,
    pub metrics: PerformanceMetrics,
}

/// The run summary document.
///
/// `reason` reads `"completed"` for a completed run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub status: Status,
    pub reason: String,
    pub end_time: f64,
    pub ticks: usize,
    pub dt: f64,
    pub final_state: VesselState,
    pub performance: PerformanceMetrics,
}

impl RunResult {
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary {
            status: self.status,
            reason: self
                .reason
                .as_ref()
                .map_or_else(|| "completed".to_owned(), ToString::to_string),
            end_time: self.end_time,
            ticks: self.ticks,
            dt: self.dt,
            final_state: self.final_state,
            performance: self.metrics,
        }
    }
}
