use std::f64::consts::PI;

use keel_core::{EnvironmentSample, ForceTriplet, VesselState, WindCoefficients};

/// Rotates a world-frame vector into the body frame of a vessel at heading `psi`.
#[must_use]
pub fn world_to_body(world_x: f64, world_y: f64, psi: f64) -> (f64, f64) {
    let (sin, cos) = (-psi).sin_cos();
    (cos * world_x - sin * world_y, sin * world_x + cos * world_y)
}

/// Vessel velocity over ground in the world frame.
#[must_use]
pub fn body_to_world_velocity(state: &VesselState) -> (f64, f64) {
    let (sin, cos) = state.psi.sin_cos();
    (state.u * cos - state.v * sin, state.u * sin + state.v * cos)
}

/// Quadratic aerodynamic drag from the apparent wind.
///
/// The wind "from" direction is turned into a "to" vector, the vessel's own
/// velocity is subtracted, and the result is rotated into the body frame. Each
/// body axis then sees `0.5 rho_air c A w|w|` along the apparent flow, so the
/// force always points downwind of the vessel.
#[must_use]
pub fn wind_force(
    state: &VesselState,
    env: &EnvironmentSample,
    coefficients: &WindCoefficients,
    lpp: f64,
    beam: f64,
    draft: f64,
) -> ForceTriplet {
    let speed = env.wind_speed.max(0.0);
    let (sin_to, cos_to) = (env.wind_dir_from + PI).sin_cos();
    let (vessel_x, vessel_y) = body_to_world_velocity(state);

    let apparent_x = speed * cos_to - vessel_x;
    let apparent_y = speed * sin_to - vessel_y;
    let (wx, wy) = world_to_body(apparent_x, apparent_y, state.psi);

    let area = coefficients.area(beam, draft);
    let pressure = 0.5 * coefficients.air_density * area;
    let x = pressure * coefficients.cx * wx * wx.abs();
    let y = pressure * coefficients.cy * wy * wy.abs();
    let n = y * coefficients.lever * lpp;

    ForceTriplet::new(x, y, n)
}
