use keel_core::{
    ControlInput, EnvironmentSample, ForceResult, ForceTriplet, ModuleForce,
    NumericalInstability, VesselParams, VesselState, validation::check_control_bounds,
};

use crate::forces::ForceModule;

/// Sums a fixed, ordered list of force modules.
///
/// Summation runs strictly left to right over the registered modules, so two
/// aggregators with the same modules in the same order produce bit-identical
/// totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForceAggregator {
    modules: Vec<ForceModule>,
}

impl Default for ForceAggregator {
    fn default() -> Self {
        Self::standard()
    }
}

impl ForceAggregator {
    /// Every module in the order hull, propulsion, rudder, wind, current,
    /// bow thruster, stern thruster.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(ForceModule::ALL)
    }

    /// An aggregator over the given modules, summed in the order given.
    #[must_use]
    pub fn new(modules: impl IntoIterator<Item = ForceModule>) -> Self {
        Self {
            modules: modules.into_iter().collect(),
        }
    }

    /// An aggregator with no modules. Its total is always zero.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    #[must_use]
    pub fn modules(&self) -> &[ForceModule] {
        &self.modules
    }

    /// Validates the control command, then sums every module.
    ///
    /// # Errors
    ///
    /// Returns an error if a command is non-finite or outside the vessel's
    /// actuator limits. The time reported is the state's time.
    pub fn aggregate(
        &self,
        state: &VesselState,
        control: &ControlInput,
        env: &EnvironmentSample,
        params: &VesselParams,
    ) -> Result<ForceResult, NumericalInstability> {
        check_control_bounds(control, params, state.t)?;
        Ok(self.sum(state, control, env, params))
    }

    /// Sums every module without validating the command.
    #[must_use]
    pub fn sum(
        &self,
        state: &VesselState,
        control: &ControlInput,
        env: &EnvironmentSample,
        params: &VesselParams,
    ) -> ForceResult {
        let mut total = ForceTriplet::ZERO;
        let mut components = Vec::with_capacity(self.modules.len());
        for module in &self.modules {
            let force = module.compute(state, control, env, params);
            total += force;
            components.push(ModuleForce {
                name: module.name(),
                force,
            });
        }
        ForceResult { total, components }
    }

    /// Sums every module, keeping only the total.
    #[must_use]
    pub fn total(
        &self,
        state: &VesselState,
        control: &ControlInput,
        env: &EnvironmentSample,
        params: &VesselParams,
    ) -> ForceTriplet {
        self.modules
            .iter()
            .fold(ForceTriplet::ZERO, |total, module| {
                total + module.compute(state, control, env, params)
            })
    }
}
