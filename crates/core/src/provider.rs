//! Contracts between the simulation loop and its collaborators.

use serde::{Deserialize, Serialize};

use crate::{
    ControlInput, ControlSignal, Derivatives, EnvironmentSample, ForceResult,
    NumericalInstability, StateVector, VesselParams, VesselState,
};

/// A heading and speed an autopilot steers towards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Desired heading [rad].
    pub heading: f64,
    /// Desired speed over ground [m/s].
    pub speed: f64,
}

/// Supplies actuator commands to the loop.
///
/// Implementations may hold mutable state (an autopilot's integrators, for
/// example), which is why `compute` takes `&mut self`. One provider instance
/// belongs to one run.
pub trait ControlProvider {
    /// The absolute command in effect before the first step.
    ///
    /// The loop seeds its actuator integrator from this value.
    fn current(&self) -> ControlInput;

    /// The provider's target, if it steers towards one.
    fn target(&self) -> Option<Target> {
        None
    }

    /// Computes the command for the step starting at `t`.
    fn compute(&mut self, t: f64, state: &VesselState, target: Option<&Target>) -> ControlSignal;
}

impl<P: ControlProvider + ?Sized> ControlProvider for &mut P {
    fn current(&self) -> ControlInput {
        (**self).current()
    }

    fn target(&self) -> Option<Target> {
        (**self).target()
    }

    fn compute(&mut self, t: f64, state: &VesselState, target: Option<&Target>) -> ControlSignal {
        (**self).compute(t, state, target)
    }
}

/// Supplies environmental conditions at a query time.
pub trait EnvironmentProvider {
    fn sample(&self, t: f64, state: &VesselState) -> EnvironmentSample;
}

impl<P: EnvironmentProvider + ?Sized> EnvironmentProvider for &P {
    fn sample(&self, t: f64, state: &VesselState) -> EnvironmentSample {
        (**self).sample(t, state)
    }
}

/// A vessel model the loop can integrate.
pub trait VesselModel {
    /// Aggregated body-fixed forces with the per-module breakdown.
    ///
    /// # Errors
    ///
    /// Returns an error if the control command is non-finite or outside the
    /// vessel's actuator limits.
    fn forces(
        &self,
        state: &VesselState,
        control: &ControlInput,
        env: &EnvironmentSample,
        params: &VesselParams,
    ) -> Result<ForceResult, NumericalInstability>;

    /// State derivatives at time `t`.
    ///
    /// Evaluated repeatedly inside the ODE solver, so it performs no
    /// validation and must not fail; callers validate the control first.
    fn derivatives(
        &self,
        t: f64,
        state: &VesselState,
        control: &ControlInput,
        env: &EnvironmentSample,
        params: &VesselParams,
    ) -> Derivatives;

    fn pack(&self, state: &VesselState) -> StateVector {
        state.pack()
    }

    fn unpack(&self, t: f64, y: &StateVector) -> VesselState {
        VesselState::unpack(t, y)
    }
}
