use keel_core::{ControlInput, Record, VesselState};

use super::RunResult;

/// Events emitted by the simulation loop.
///
/// Steps count accepted segments from zero. Tick and stream events for step
/// `k` describe the state at the start of that segment.
#[derive(Debug, Clone)]
pub enum Event {
    /// A flattened record for every `output_decimation`-th step.
    Tick { step: usize, record: Record },

    /// A lightweight state update for every `stream_decimation`-th step.
    Stream {
        step: usize,
        state: VesselState,
        control: ControlInput,
    },

    /// The run has ended. Emitted exactly once.
    Finished(RunResult),
}
