//! Pre-run validation and per-step numerical checks.

use std::fmt;

use serde::Serialize;

use crate::{
    ConfigError, ControlInput, Derivatives, NumericalInstability, PidGains, SimulationConfig,
    TerminationBounds, VesselParams, VesselState,
};

/// Rejects physically meaningless vessel parameters.
///
/// # Errors
///
/// Returns an error for non-positive mass, yaw inertia, principal dimensions
/// or water density, and for inverted RPM or rudder ranges.
pub fn validate_params(params: &VesselParams) -> Result<(), ConfigError> {
    if !params.mass.is_finite() || params.mass <= 0.0 {
        return Err(ConfigError::Mass(params.mass));
    }
    if !params.yaw_inertia.is_finite() || params.yaw_inertia <= 0.0 {
        return Err(ConfigError::YawInertia(params.yaw_inertia));
    }
    for (name, value) in [
        ("lpp", params.lpp),
        ("beam", params.beam),
        ("draft", params.draft),
        ("rho_water", params.rho_water),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::Dimension { name, value });
        }
    }
    if !ordered(params.rpm_min, params.rpm_max) {
        return Err(ConfigError::RpmRange {
            min: params.rpm_min,
            max: params.rpm_max,
        });
    }
    if !ordered(params.rudder_min, params.rudder_max) {
        return Err(ConfigError::RudderRange {
            min: params.rudder_min,
            max: params.rudder_max,
        });
    }
    Ok(())
}

/// Strictly increasing and free of NaN.
fn ordered(min: f64, max: f64) -> bool {
    min.is_finite() && max.is_finite() && min < max
}

/// Rejects an unusable run configuration.
///
/// # Errors
///
/// Returns the first invalid field found.
pub fn validate_config(config: &SimulationConfig) -> Result<(), ConfigError> {
    if !config.dt.is_finite() || config.dt <= 0.0 {
        return Err(ConfigError::TimeStep(config.dt));
    }
    if !config.t0.is_finite() {
        return Err(ConfigError::StartTime(config.t0));
    }
    if !config.t_end.is_finite() || config.t_end <= config.t0 {
        return Err(ConfigError::Horizon {
            t0: config.t0,
            t_end: config.t_end,
        });
    }
    if config.output_decimation == 0 || config.stream_decimation == 0 {
        return Err(ConfigError::Decimation);
    }
    for (name, value) in [("rel_tol", config.rel_tol), ("abs_tol", config.abs_tol)] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::Tolerance { name, value });
        }
    }
    let safety = &config.safety;
    for (name, value) in [
        ("max_position_jump", safety.max_position_jump),
        ("min_advance_fraction", safety.min_advance_fraction),
        ("min_advance_floor", safety.min_advance_floor),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(ConfigError::Safety { name, value });
        }
    }
    if let Some(bounds) = &config.termination_bounds {
        validate_bounds(bounds)?;
    }
    if let Some(autopilot) = &config.autopilot {
        validate_gains("heading", &autopilot.heading)?;
        validate_gains("speed", &autopilot.speed)?;
    }
    Ok(())
}

fn validate_bounds(bounds: &TerminationBounds) -> Result<(), ConfigError> {
    for (axis, min, max) in [
        ("x", bounds.x_min, bounds.x_max),
        ("y", bounds.y_min, bounds.y_max),
    ] {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(ConfigError::TerminationBounds { axis, min, max });
            }
        }
    }
    Ok(())
}

/// Rejects non-finite gains or inverted output saturation.
///
/// # Errors
///
/// Returns [`ConfigError::PidGains`] naming the axis.
pub fn validate_gains(axis: &'static str, gains: &PidGains) -> Result<(), ConfigError> {
    let finite = [gains.kp, gains.ki, gains.kd, gains.out_min, gains.out_max]
        .iter()
        .all(|value| value.is_finite());
    if !finite || gains.out_min > gains.out_max {
        return Err(ConfigError::PidGains { axis });
    }
    Ok(())
}

/// Checks the initial conditions of a run.
///
/// # Errors
///
/// Returns [`ConfigError::InitialState`] for the first non-finite component.
pub fn validate_initial_state(state: &VesselState) -> Result<(), ConfigError> {
    check_finite_state(state).map_err(|err| match err {
        NumericalInstability::NonFinite {
            component, value, ..
        } => ConfigError::InitialState { component, value },
        _ => ConfigError::InitialState {
            component: "state",
            value: f64::NAN,
        },
    })
}

/// Requires every state component, including time, to be finite.
///
/// # Errors
///
/// Returns [`NumericalInstability::NonFinite`] for the first offending component.
pub fn check_finite_state(state: &VesselState) -> Result<(), NumericalInstability> {
    for (component, value) in state.components() {
        if !value.is_finite() {
            return Err(NumericalInstability::NonFinite {
                component,
                value,
                time: state.t,
            });
        }
    }
    Ok(())
}

/// Requires an absolute command to be finite and inside the actuator limits.
///
/// # Errors
///
/// Returns [`NumericalInstability::NonFinite`] or
/// [`NumericalInstability::OutOfBounds`].
pub fn check_control_bounds(
    control: &ControlInput,
    params: &VesselParams,
    time: f64,
) -> Result<(), NumericalInstability> {
    let limited = [
        ("rpm", control.rpm, params.rpm_min, params.rpm_max),
        (
            "rudder_angle",
            control.rudder_angle,
            params.rudder_min,
            params.rudder_max,
        ),
    ];
    for (component, value, min, max) in limited {
        if !value.is_finite() {
            return Err(NumericalInstability::NonFinite {
                component,
                value,
                time,
            });
        }
        if value < min || value > max {
            return Err(NumericalInstability::OutOfBounds {
                component,
                value,
                min,
                max,
                time,
            });
        }
    }

    let optional = [
        ("throttle", control.throttle),
        ("bow_thruster_force", control.bow_thruster.map(|cmd| cmd.force)),
        ("bow_thruster_angle", control.bow_thruster.map(|cmd| cmd.angle)),
        ("stern_thruster_force", control.stern_thruster.map(|cmd| cmd.force)),
        ("stern_thruster_angle", control.stern_thruster.map(|cmd| cmd.angle)),
    ];
    for (component, value) in optional {
        if let Some(value) = value.filter(|value| !value.is_finite()) {
            return Err(NumericalInstability::NonFinite {
                component,
                value,
                time,
            });
        }
    }
    Ok(())
}

/// Requires every derivative component to be finite.
///
/// # Errors
///
/// Returns [`NumericalInstability::NonFinite`] for the first offending component.
pub fn check_finite_derivatives(
    derivatives: &Derivatives,
    time: f64,
) -> Result<(), NumericalInstability> {
    for (component, value) in derivatives.components() {
        if !value.is_finite() {
            return Err(NumericalInstability::NonFinite {
                component,
                value,
                time,
            });
        }
    }
    Ok(())
}

/// Checks an accepted segment: the new state must be finite and must not
/// move further than `threshold` along either axis.
///
/// # Errors
///
/// Returns [`NumericalInstability::NonFinite`] or
/// [`NumericalInstability::PositionJump`].
pub fn detect_numerical_issue(
    before: &VesselState,
    after: &VesselState,
    threshold: f64,
) -> Result<(), NumericalInstability> {
    check_finite_state(after)?;
    let dx = (after.x - before.x).abs();
    let dy = (after.y - before.y).abs();
    if dx > threshold || dy > threshold {
        return Err(NumericalInstability::PositionJump {
            dx,
            dy,
            threshold,
            time: after.t,
        });
    }
    Ok(())
}

/// Which side of the termination box a state left through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bound {
    XBelow,
    XAbove,
    YBelow,
    YAbove,
}

impl Bound {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::XBelow => "x below bound",
            Self::XAbove => "x above bound",
            Self::YBelow => "y below bound",
            Self::YAbove => "y above bound",
        }
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TerminationBounds {
    /// Returns the first violated side, checked in `x_min, x_max, y_min, y_max` order.
    #[must_use]
    pub fn check(&self, state: &VesselState) -> Option<Bound> {
        if self.x_min.is_some_and(|min| state.x < min) {
            return Some(Bound::XBelow);
        }
        if self.x_max.is_some_and(|max| state.x > max) {
            return Some(Bound::XAbove);
        }
        if self.y_min.is_some_and(|min| state.y < min) {
            return Some(Bound::YBelow);
        }
        if self.y_max.is_some_and(|max| state.y > max) {
            return Some(Bound::YAbove);
        }
        None
    }
}

/// Applies the configured termination box, if any.
#[must_use]
pub fn apply_termination_bounds(state: &VesselState, config: &SimulationConfig) -> Option<Bound> {
    config
        .termination_bounds
        .as_ref()
        .and_then(|bounds| bounds.check(state))
}
