use keel_core::{AutopilotConfig, ControlRate, Target, VesselState};

use super::pid::{PidAxis, wrap_angle};

/// Heading and speed autopilot producing actuator rates.
///
/// The heading axis turns the wrapped heading error into a rudder slew rate.
/// The speed axis turns the speed-over-ground error into an RPM rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateAutopilot {
    pub heading: PidAxis,
    pub speed: PidAxis,
}

impl RateAutopilot {
    #[must_use]
    pub fn new(heading: PidAxis, speed: PidAxis) -> Self {
        Self { heading, speed }
    }

    #[must_use]
    pub fn from_config(config: &AutopilotConfig) -> Self {
        Self::new(PidAxis::new(config.heading), PidAxis::new(config.speed))
    }

    /// Heading error towards `target`, wrapped into `(-pi, pi]`.
    #[must_use]
    pub fn heading_error(state: &VesselState, target: &Target) -> f64 {
        wrap_angle(target.heading - state.psi)
    }

    /// Computes the actuator rates for the step starting at `t`.
    pub fn update(&mut self, t: f64, state: &VesselState, target: &Target) -> ControlRate {
        let rudder_rate = self.heading.update(t, Self::heading_error(state, target));
        let rpm_rate = self.speed.update(t, target.speed - state.speed());
        ControlRate {
            rpm_rate,
            rudder_rate,
        }
    }

    pub fn reset(&mut self) {
        self.heading.reset();
        self.speed.reset();
    }
}
