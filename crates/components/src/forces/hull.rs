use keel_core::{ForceTriplet, HullCoefficients, VesselState};

/// Hull damping with MMG-style cross-coupling.
///
/// ```text
/// X = xu u + xuu u|u| + xvr v r + xvv v|v| + xrr r|r|
/// Y = yv v + yvv v|v| + yuv u v + yur u r + yvr v r
/// N = nr r + nrr r|r| + nuv u v + nur u r + nvv v|v|
/// ```
#[must_use]
pub fn hull_force(state: &VesselState, coefficients: &HullCoefficients) -> ForceTriplet {
    let HullCoefficients {
        xu,
        xuu,
        xvr,
        xvv,
        xrr,
        yv,
        yvv,
        yuv,
        yur,
        yvr,
        nr,
        nrr,
        nuv,
        nur,
        nvv,
    } = *coefficients;
    let VesselState { u, v, r, .. } = *state;

    let x = xu * u + xuu * u * u.abs() + xvr * v * r + xvv * v * v.abs() + xrr * r * r.abs();
    let y = yv * v + yvv * v * v.abs() + yuv * u * v + yur * u * r + yvr * v * r;
    let n = nr * r + nrr * r * r.abs() + nuv * u * v + nur * u * r + nvv * v * v.abs();

    ForceTriplet::new(x, y, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn no_motion_no_force() {
        let force = hull_force(&VesselState::default(), &HullCoefficients::default());

        assert_eq!(force, ForceTriplet::ZERO);
    }

    #[test]
    fn pure_surge_is_damped() {
        let state = VesselState {
            u: 2.0,
            ..VesselState::default()
        };

        let force = hull_force(&state, &HullCoefficients::default());

        // -5e4 * 2 - 5e3 * 4
        assert_relative_eq!(force.x, -1.2e5);
        assert_relative_eq!(force.y, 0.0);
        assert_relative_eq!(force.n, 0.0);
    }

    #[test]
    fn surge_yaw_coupling_feeds_sway_and_yaw() {
        let state = VesselState {
            u: 5.0,
            r: 0.01,
            ..VesselState::default()
        };
        let coefficients = HullCoefficients::default();

        let force = hull_force(&state, &coefficients);

        assert_relative_eq!(force.y, coefficients.yur * 5.0 * 0.01);
        assert_relative_eq!(
            force.n,
            coefficients.nr * 0.01 + coefficients.nrr * 1.0e-4 + coefficients.nur * 0.05,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            force.x,
            coefficients.xu * 5.0 + coefficients.xuu * 25.0 + coefficients.xrr * 1.0e-4,
            max_relative = 1e-12
        );
    }

    #[test]
    fn quadratic_terms_keep_the_sign_of_motion() {
        let ahead = VesselState {
            v: 0.5,
            ..VesselState::default()
        };
        let astern = VesselState {
            v: -0.5,
            ..VesselState::default()
        };
        let coefficients = HullCoefficients::default();

        let a = hull_force(&ahead, &coefficients);
        let b = hull_force(&astern, &coefficients);

        assert_relative_eq!(a.y, -b.y);
        assert_relative_eq!(a.n, -b.n);
        // v|v| flips sign too, so surge reacts antisymmetrically
        assert_relative_eq!(a.x, -b.x);
    }
}
