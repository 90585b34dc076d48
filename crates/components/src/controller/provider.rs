use keel_core::{
    AutopilotConfig, ControlInput, ControlProvider, ControlSignal, Target, VesselState,
};

use super::autopilot::RateAutopilot;

/// Supplies the heading and speed an autopilot steers towards.
pub trait TargetProvider {
    fn desired(&self, t: f64, state: &VesselState) -> Target;
}

impl<F> TargetProvider for F
where
    F: Fn(f64, &VesselState) -> Target,
{
    fn desired(&self, t: f64, state: &VesselState) -> Target {
        self(t, state)
    }
}

/// A constant heading and speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTarget {
    pub heading: f64,
    pub speed: f64,
}

impl TargetProvider for FixedTarget {
    fn desired(&self, _t: f64, _state: &VesselState) -> Target {
        Target {
            heading: self.heading,
            speed: self.speed,
        }
    }
}

/// A rate autopilot steering towards a target, emitting rate signals.
///
/// The target is re-evaluated from the target provider at every `compute`;
/// a target passed in by the caller is ignored.
#[derive(Debug, Clone)]
pub struct AutopilotProvider<T: TargetProvider> {
    autopilot: RateAutopilot,
    targets: T,
    initial: ControlInput,
    last_target: Option<Target>,
}

impl<T: TargetProvider> AutopilotProvider<T> {
    /// Creates a provider whose actuators start from `initial`.
    #[must_use]
    pub fn new(autopilot: RateAutopilot, targets: T, initial: ControlInput) -> Self {
        Self {
            autopilot,
            targets,
            initial,
            last_target: None,
        }
    }

    #[must_use]
    pub fn autopilot(&self) -> &RateAutopilot {
        &self.autopilot
    }
}

impl AutopilotProvider<FixedTarget> {
    /// Builds the autopilot, its fixed target, and its initial command from a
    /// scenario block.
    #[must_use]
    pub fn from_config(config: &AutopilotConfig) -> Self {
        Self::new(
            RateAutopilot::from_config(config),
            FixedTarget {
                heading: config.target_heading,
                speed: config.target_speed,
            },
            ControlInput::new(config.initial_rpm, config.initial_rudder),
        )
    }
}

impl<T: TargetProvider> ControlProvider for AutopilotProvider<T> {
    fn current(&self) -> ControlInput {
        self.initial
    }

    /// The target of the latest `compute`, or the initial target before it.
    fn target(&self) -> Option<Target> {
        self.last_target
            .or_else(|| Some(self.targets.desired(0.0, &VesselState::default())))
    }

    fn compute(&mut self, t: f64, state: &VesselState, _target: Option<&Target>) -> ControlSignal {
        let target = self.targets.desired(t, state);
        self.last_target = Some(target);
        self.autopilot.update(t, state, &target).into()
    }
}

/// The same absolute command at every step.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedCommand(pub ControlInput);

impl ControlProvider for FixedCommand {
    fn current(&self) -> ControlInput {
        self.0
    }

    fn compute(&mut self, _t: f64, _state: &VesselState, _target: Option<&Target>) -> ControlSignal {
        ControlSignal::Absolute(self.0)
    }
}
