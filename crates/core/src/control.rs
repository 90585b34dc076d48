use serde::{Deserialize, Serialize};

/// A thruster command: force magnitude with sign, and direction in the body frame.
///
/// The body-frame components are `force * cos(angle)` in surge and
/// `force * sin(angle)` in sway, so a tunnel thruster pushing to port uses `pi/2`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ThrusterCommand {
    /// Commanded force [N]. The sign reverses the thrust direction.
    pub force: f64,
    /// Thrust direction [rad].
    #[serde(default)]
    pub angle: f64,
}

/// Absolute actuator commands in internal units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlInput {
    /// Commanded propeller speed [RPM].
    pub rpm: f64,
    /// Commanded rudder angle [rad], positive to port.
    pub rudder_angle: f64,
    /// Optional throttle setting in `[0, 1]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bow_thruster: Option<ThrusterCommand>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stern_thruster: Option<ThrusterCommand>,
}

impl ControlInput {
    /// Creates a command with only propeller speed and rudder angle set.
    #[must_use]
    pub fn new(rpm: f64, rudder_angle: f64) -> Self {
        Self {
            rpm,
            rudder_angle,
            ..Self::default()
        }
    }

    /// Returns `self` with the given bow thruster command.
    #[must_use]
    pub fn with_bow_thruster(self, force: f64, angle: f64) -> Self {
        Self {
            bow_thruster: Some(ThrusterCommand { force, angle }),
            ..self
        }
    }

    /// Returns `self` with the given stern thruster command.
    #[must_use]
    pub fn with_stern_thruster(self, force: f64, angle: f64) -> Self {
        Self {
            stern_thruster: Some(ThrusterCommand { force, angle }),
            ..self
        }
    }
}

/// Actuator rates produced by a rate autopilot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlRate {
    /// Propeller speed rate [RPM/s].
    pub rpm_rate: f64,
    /// Rudder slew rate [rad/s].
    pub rudder_rate: f64,
}

/// A control provider's output for one step.
///
/// Absolute commands are consumed as-is. Rate commands are integrated over the
/// step into absolute commands by the loop's actuator integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlSignal {
    Absolute(ControlInput),
    Rate(ControlRate),
}

impl From<ControlInput> for ControlSignal {
    fn from(input: ControlInput) -> Self {
        Self::Absolute(input)
    }
}

impl From<ControlRate> for ControlSignal {
    fn from(rate: ControlRate) -> Self {
        Self::Rate(rate)
    }
}
