use keel_core::{CurrentCoefficients, EnvironmentSample, ForceTriplet, VesselState};

use super::wind::world_to_body;

/// Shallow-water drag multiplier for the given depth and draft.
///
/// Applies only when the sample carries a positive depth and the depth to
/// draft ratio is below `min_depth_ratio`.
#[must_use]
pub fn depth_factor(depth: Option<f64>, draft: f64, coefficients: &CurrentCoefficients) -> f64 {
    match depth {
        Some(depth) if coefficients.depth_effect && depth > 0.0 => {
            let ratio = depth / draft;
            if ratio < coefficients.min_depth_ratio {
                1.0 + 0.5 * (coefficients.min_depth_ratio - ratio)
            } else {
                1.0
            }
        }
        _ => 1.0,
    }
}

/// Linear and quadratic drag against the water flowing past the hull.
///
/// The relative water velocity is the body velocity minus the current, both
/// in the body frame, so a vessel at rest in a current is carried along with it.
#[must_use]
pub fn current_force(
    state: &VesselState,
    env: &EnvironmentSample,
    coefficients: &CurrentCoefficients,
    lpp: f64,
    draft: f64,
) -> ForceTriplet {
    let speed = env.current_speed.max(0.0);
    let (sin_to, cos_to) = env.current_dir_to.sin_cos();
    let (current_u, current_v) = world_to_body(speed * cos_to, speed * sin_to, state.psi);

    let rel_u = state.u - current_u;
    let rel_v = state.v - current_v;

    let CurrentCoefficients {
        kx_linear,
        ky_linear,
        kx_quad,
        ky_quad,
        lever,
        ..
    } = *coefficients;
    let factor = depth_factor(env.depth, draft, coefficients);

    let x = factor * (-kx_linear * rel_u - kx_quad * rel_u * rel_u.abs());
    let y = factor * (-ky_linear * rel_v - ky_quad * rel_v * rel_v.abs());
    let n = y * lever * lpp;

    ForceTriplet::new(x, y, n)
}
