use std::f64::consts::PI;

use keel_core::{ControlInput, ForceTriplet, RudderCoefficients, VesselState};

/// Lift coefficient at rudder angle `delta`.
///
/// Linear up to the stall angle. Past stall the lift at the stall angle is
/// reduced by half for every further stall angle of deflection, never dropping
/// below 30% of the stall lift.
#[must_use]
pub fn lift_coefficient(delta: f64, coefficients: &RudderCoefficients) -> f64 {
    let stall = coefficients.stall_angle;
    if delta.abs() <= stall {
        return coefficients.lift_slope * delta;
    }
    let stall_factor = (1.0 - 0.5 * (delta.abs() - stall) / stall).max(0.3);
    (coefficients.lift_slope * stall * stall_factor).copysign(delta)
}

/// Drag coefficient: base drag, induced drag, and an angle-dependent term.
#[must_use]
pub fn drag_coefficient(delta: f64, lift: f64, coefficients: &RudderCoefficients) -> f64 {
    let base = coefficients.drag_coefficient;
    let induced = lift * lift / (PI * coefficients.aspect_ratio);
    let angle = base * (delta.abs() / coefficients.stall_angle).powi(2);
    base + induced + angle
}

/// Rudder lift and drag in the hull's inflow, boosted by the propeller slipstream.
#[must_use]
pub fn rudder_force(
    state: &VesselState,
    control: &ControlInput,
    coefficients: &RudderCoefficients,
    rho: f64,
    lpp: f64,
    draft: f64,
) -> ForceTriplet {
    let hull_inflow = (state.u * state.u + 0.25 * state.v * state.v).sqrt();
    let rpm = control.rpm.abs();
    let inflow = if rpm > 1.0e-6 {
        let boost = (rpm / coefficients.slipstream_saturation_rpm).min(1.0);
        hull_inflow.max(coefficients.slipstream_factor * hull_inflow * boost)
    } else {
        hull_inflow
    };

    let dynamic_pressure = 0.5 * rho * inflow * inflow;
    let area = coefficients.area(lpp, draft);

    let delta = control.rudder_angle;
    let lift = lift_coefficient(delta, coefficients);
    let drag = drag_coefficient(delta, lift, coefficients);

    let y = dynamic_pressure * area * lift;
    let x = -dynamic_pressure * area * drag;
    let n = -y * coefficients.x_rudder(lpp);

    ForceTriplet::new(x, y, n)
}
