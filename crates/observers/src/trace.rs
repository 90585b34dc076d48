use keel_core::Observer;
use tracing::{debug, info};

use crate::traits::{HasRecord, HasRunResult};

/// Logs tick records and the run outcome through `tracing`.
///
/// Every `every`-th tick is logged at debug level with the pose, the speed,
/// and the applied actuator commands. The end of the run is logged at info
/// level. Never requests an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceObserver {
    every: usize,
    seen: usize,
}

impl TraceObserver {
    /// Logs every `every`-th tick; zero is treated as one.
    #[must_use]
    pub fn new(every: usize) -> Self {
        Self {
            every: every.max(1),
            seen: 0,
        }
    }

    /// Number of ticks seen so far.
    #[must_use]
    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl Default for TraceObserver {
    fn default() -> Self {
        Self::new(1)
    }
}

impl<E, A> Observer<E, A> for TraceObserver
where
    E: HasRecord + HasRunResult,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if let Some(record) = event.record() {
            if self.seen % self.every == 0 {
                debug!(
                    t = record.get("t"),
                    x = record.get("x"),
                    y = record.get("y"),
                    psi = record.get("psi"),
                    speed = record.get("speed"),
                    rpm = record.get("rpm"),
                    rudder = record.get("rudder_angle"),
                    "tick"
                );
            }
            self.seen += 1;
        } else if let Some(result) = event.run_result() {
            info!(
                status = ?result.status,
                end_time = result.end_time,
                ticks = result.ticks,
                logged = self.seen,
                "run finished"
            );
        }
        None
    }
}
