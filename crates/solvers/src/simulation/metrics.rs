use std::time::{Duration, Instant};

use serde::Serialize;

/// Wall-clock and solver statistics for one run. Times are in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct PerformanceMetrics {
    pub total_wall_time: f64,
    pub solver_time: f64,
    pub solver_calls: u64,
    pub derivative_evaluations: u64,
    pub solver_time_fraction: f64,
    pub average_solver_time: f64,
    /// Simulated seconds per wall-clock second.
    pub simulation_speed_ratio: f64,
}

/// Accumulates timings while a run is in progress.
#[derive(Debug)]
pub(crate) struct MetricsClock {
    started: Instant,
    solver_time: Duration,
    solver_calls: u64,
    derivative_evaluations: u64,
}

impl MetricsClock {
    pub(crate) fn start() -> Self {
        Self {
            started: Instant::now(),
            solver_time: Duration::ZERO,
            solver_calls: 0,
            derivative_evaluations: 0,
        }
    }

    pub(crate) fn record_solve(&mut self, elapsed: Duration, evaluations: u32) {
        self.solver_time += elapsed;
        self.solver_calls += 1;
        self.derivative_evaluations += u64::from(evaluations);
    }

    pub(crate) fn finish(&self, simulated: f64) -> PerformanceMetrics {
        let total = self.started.elapsed().as_secs_f64();
        let solver = self.solver_time.as_secs_f64();
        let ratio = |numerator: f64, denominator: f64| {
            if denominator > 0.0 {
                numerator / denominator
            } else {
                0.0
            }
        };

        #[allow(clippy::cast_precision_loss)]
        let calls = self.solver_calls as f64;

        PerformanceMetrics {
            total_wall_time: total,
            solver_time: solver,
            solver_calls: self.solver_calls,
            derivative_evaluations: self.derivative_evaluations,
            solver_time_fraction: ratio(solver, total),
            average_solver_time: ratio(solver, calls),
            simulation_speed_ratio: ratio(simulated, total),
        }
    }
}
