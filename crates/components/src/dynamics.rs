use keel_core::{
    ControlInput, Derivatives, EnvironmentSample, ForceResult, NumericalInstability,
    VesselModel, VesselParams, VesselState,
};

use crate::aggregate::ForceAggregator;

/// Smallest effective mass or inertia used as a divisor.
const MIN_EFFECTIVE_INERTIA: f64 = 1.0e-6;

/// Three-degree-of-freedom maneuvering model.
///
/// Kinematics rotate the body velocities into the world frame through the
/// heading. The dynamics solve the decoupled added-mass equations
///
/// ```text
/// du = (X - m v r) / (m - X_u_dot)
/// dv = (Y + m u r) / (m - Y_v_dot)
/// dr = N / (Iz - N_r_dot)
/// ```
///
/// with each denominator floored at a small positive value.
#[derive(Debug, Clone, Default)]
pub struct DynamicsModel {
    aggregator: ForceAggregator,
}

impl DynamicsModel {
    #[must_use]
    pub fn new(aggregator: ForceAggregator) -> Self {
        Self { aggregator }
    }

    #[must_use]
    pub fn aggregator(&self) -> &ForceAggregator {
        &self.aggregator
    }
}

impl VesselModel for DynamicsModel {
    fn forces(
        &self,
        state: &VesselState,
        control: &ControlInput,
        env: &EnvironmentSample,
        params: &VesselParams,
    ) -> Result<ForceResult, NumericalInstability> {
        self.aggregator.aggregate(state, control, env, params)
    }

    fn derivatives(
        &self,
        _t: f64,
        state: &VesselState,
        control: &ControlInput,
        env: &EnvironmentSample,
        params: &VesselParams,
    ) -> Derivatives {
        let VesselState { psi, u, v, r, .. } = *state;
        let (sin, cos) = psi.sin_cos();

        let force = self.aggregator.total(state, control, env, params);
        let m = params.mass;
        let surge_mass = (m - params.x_u_dot).max(MIN_EFFECTIVE_INERTIA);
        let sway_mass = (m - params.y_v_dot).max(MIN_EFFECTIVE_INERTIA);
        let yaw_inertia = (params.yaw_inertia - params.n_r_dot).max(MIN_EFFECTIVE_INERTIA);

        Derivatives {
            dx: u * cos - v * sin,
            dy: u * sin + v * cos,
            dpsi: r,
            du: (force.x - m * v * r) / surge_mass,
            dv: (force.y + m * u * r) / sway_mass,
            dr: force.n / yaw_inertia,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::FRAC_PI_2;

    use approx::assert_relative_eq;

    use crate::{example::coastal_vessel, forces::ForceModule};

    #[test]
    fn rest_state_has_all_zero_derivatives() {
        let model = DynamicsModel::default();

        let derivatives = model.derivatives(
            0.0,
            &VesselState::default(),
            &ControlInput::default(),
            &EnvironmentSample::calm(),
            &coastal_vessel(),
        );

        assert_eq!(derivatives, Derivatives::default());
    }

    #[test]
    fn kinematics_rotate_body_velocity_into_the_world() {
        let model = DynamicsModel::new(ForceAggregator::empty());
        let state = VesselState {
            psi: FRAC_PI_2,
            u: 3.0,
            v: 1.0,
            r: 0.02,
            ..VesselState::default()
        };

        let derivatives = model.derivatives(
            0.0,
            &state,
            &ControlInput::default(),
            &EnvironmentSample::calm(),
            &coastal_vessel(),
        );

        assert_relative_eq!(derivatives.dx, -1.0, max_relative = 1e-12);
        assert_relative_eq!(derivatives.dy, 3.0, max_relative = 1e-12);
        assert_relative_eq!(derivatives.dpsi, 0.02);
    }

    #[test]
    fn coriolis_terms_couple_surge_and_sway() {
        let params = coastal_vessel();
        let model = DynamicsModel::new(ForceAggregator::empty());
        let state = VesselState {
            u: 4.0,
            v: 0.5,
            r: 0.01,
            ..VesselState::default()
        };

        let derivatives = model.derivatives(
            0.0,
            &state,
            &ControlInput::default(),
            &EnvironmentSample::calm(),
            &params,
        );

        assert_relative_eq!(derivatives.du, -5.0e6 * 0.5 * 0.01 / 5.25e6, max_relative = 1e-12);
        assert_relative_eq!(derivatives.dv, 5.0e6 * 4.0 * 0.01 / 7.5e6, max_relative = 1e-12);
        assert_relative_eq!(derivatives.dr, 0.0);
    }

    #[test]
    fn bollard_thrust_accelerates_through_the_added_mass() {
        let params = coastal_vessel();
        let model = DynamicsModel::new(ForceAggregator::new([ForceModule::Propulsion]));

        let derivatives = model.derivatives(
            0.0,
            &VesselState::default(),
            &ControlInput::new(50.0, 0.0),
            &EnvironmentSample::calm(),
            &params,
        );

        assert_relative_eq!(derivatives.du, 21_000.0 / 5.25e6, max_relative = 1e-12);
        assert_relative_eq!(derivatives.dv, 0.0);
    }

    #[test]
    fn degenerate_inertia_is_floored() {
        let params = VesselParams {
            yaw_inertia: 1.0,
            n_r_dot: 1.0,
            ..coastal_vessel()
        };
        let model = DynamicsModel::new(ForceAggregator::new([ForceModule::Hull]));
        let state = VesselState {
            r: 0.1,
            ..VesselState::default()
        };

        let derivatives = model.derivatives(
            0.0,
            &state,
            &ControlInput::default(),
            &EnvironmentSample::calm(),
            &params,
        );

        assert!(derivatives.dr.is_finite());
        assert!(derivatives.dr < 0.0);
    }

    #[test]
    fn forces_validate_the_command() {
        let model = DynamicsModel::default();

        let result = model.forces(
            &VesselState::default(),
            &ControlInput::new(f64::NAN, 0.0),
            &EnvironmentSample::calm(),
            &coastal_vessel(),
        );

        assert!(matches!(
            result,
            Err(NumericalInstability::NonFinite { component: "rpm", .. })
        ));
    }

    #[test]
    fn pack_and_unpack_round_trip_through_the_model() {
        let model = DynamicsModel::default();
        let state = VesselState {
            t: 2.0,
            x: 10.0,
            y: -4.0,
            psi: 0.1,
            u: 2.0,
            v: 0.1,
            r: -0.01,
        };

        assert_eq!(model.unpack(state.t, &model.pack(&state)), state);
    }
}
