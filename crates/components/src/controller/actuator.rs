use keel_core::{ControlInput, ControlSignal, VesselParams};

/// Turns control signals into absolute commands within actuator limits.
///
/// Holds the absolute RPM and rudder angle between steps. Rate signals are
/// integrated over the step length and clamped. Absolute signals pass through
/// unchanged and re-seed the accumulators, so a later rate signal continues
/// from the last absolute command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActuatorIntegrator {
    rpm: f64,
    rudder: f64,
}

impl ActuatorIntegrator {
    /// Seeds the accumulators from `current`, clamped to the vessel's limits.
    #[must_use]
    pub fn new(current: &ControlInput, params: &VesselParams) -> Self {
        Self {
            rpm: params.clamp_rpm(current.rpm),
            rudder: params.clamp_rudder(current.rudder_angle),
        }
    }

    #[must_use]
    pub fn rpm(&self) -> f64 {
        self.rpm
    }

    #[must_use]
    pub fn rudder(&self) -> f64 {
        self.rudder
    }

    /// Produces the absolute command for a step of length `h`.
    pub fn apply(&mut self, signal: ControlSignal, h: f64, params: &VesselParams) -> ControlInput {
        match signal {
            ControlSignal::Absolute(input) => {
                self.rpm = params.clamp_rpm(input.rpm);
                self.rudder = params.clamp_rudder(input.rudder_angle);
                input
            }
            ControlSignal::Rate(rate) => {
                self.rpm = params.clamp_rpm(self.rpm + rate.rpm_rate * h);
                self.rudder = params.clamp_rudder(self.rudder + rate.rudder_rate * h);
                ControlInput::new(self.rpm, self.rudder)
            }
        }
    }
}
