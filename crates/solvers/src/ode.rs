//! Frozen-input integration of one simulation segment.
//!
//! Control and environment are held fixed for the whole segment; only the
//! vessel state evolves. The explicit Euler scheme steps the state directly
//! through [`StepIntegrable`], and the Runge–Kutta schemes run through
//! `ode_solvers`.

use std::{cell::RefCell, rc::Rc};

use keel_core::{
    ControlInput, EnvironmentSample, IntegrationMethod, NumericalInstability, STATE_DIM,
    StateVector, StepIntegrable, VesselModel, VesselParams, VesselState,
    validation::check_finite_derivatives,
};
use ode_solvers::{
    SVector, System,
    dop_shared::{IntegrationError, OutputType, Stats},
};
use thiserror::Error;

type Vector = SVector<f64, STATE_DIM>;

/// Maximum number of internal steps an adaptive scheme may take per segment.
const MAX_STEPS: u32 = 100_000;

/// Number of consecutive stiff steps before an adaptive scheme gives up.
const STIFFNESS_CHECKS: u32 = 1_000;

/// Inputs held fixed over one segment.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    pub control: &'a ControlInput,
    pub env: &'a EnvironmentSample,
    pub params: &'a VesselParams,
    /// Segment start [s].
    pub t: f64,
    /// Segment end [s].
    pub t_end: f64,
}

/// Tolerances for the adaptive schemes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub rel_tol: f64,
    pub abs_tol: f64,
}

/// The result of a segment solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentSolution {
    /// Last time the solver reported [s].
    pub reached: f64,
    /// State vector at `reached`.
    pub y: StateVector,
    /// Number of derivative evaluations.
    pub evaluations: u32,
}

/// Why a segment solve failed.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SegmentError {
    #[error("{0}")]
    Integration(String),

    #[error("solver produced no output")]
    NoOutput,

    #[error(transparent)]
    Instability(#[from] NumericalInstability),
}

impl From<IntegrationError> for SegmentError {
    fn from(err: IntegrationError) -> Self {
        Self::Integration(err.to_string())
    }
}

/// Integrates the state from `segment.t` to `segment.t_end`.
///
/// # Errors
///
/// Returns [`SegmentError::Instability`] if a derivative evaluation is
/// non-finite, [`SegmentError::Integration`] if the solver reports a failure,
/// and [`SegmentError::NoOutput`] if it returns no states.
pub fn solve_segment<M: VesselModel>(
    model: &M,
    segment: &Segment<'_>,
    initial: &VesselState,
    method: IntegrationMethod,
    tolerances: Tolerances,
) -> Result<SegmentSolution, SegmentError> {
    let h = segment.t_end - segment.t;
    if method == IntegrationMethod::Euler {
        return euler_step(model, segment, initial, h);
    }

    let failure = Rc::new(RefCell::new(None));
    let system = OdeSystem {
        model,
        segment,
        failure: Rc::clone(&failure),
    };
    let y0 = Vector::from_row_slice(&model.pack(initial));
    let Tolerances { rel_tol, abs_tol } = tolerances;

    let outcome = match method {
        IntegrationMethod::Euler | IntegrationMethod::Rk4 => {
            let mut stepper = ode_solvers::Rk4::new(system, segment.t, y0, segment.t_end, h);
            finish(stepper.integrate(), stepper.x_out(), stepper.y_out())
        }
        IntegrationMethod::Dopri5 => {
            let mut stepper = ode_solvers::Dopri5::from_param(
                system,
                segment.t,
                segment.t_end,
                h,
                y0,
                rel_tol,
                abs_tol,
                0.9,
                0.04,
                0.2,
                10.0,
                h,
                0.0,
                MAX_STEPS,
                STIFFNESS_CHECKS,
                OutputType::Sparse,
            );
            finish(stepper.integrate(), stepper.x_out(), stepper.y_out())
        }
        IntegrationMethod::Dop853 => {
            let mut stepper = ode_solvers::Dop853::from_param(
                system,
                segment.t,
                segment.t_end,
                h,
                y0,
                rel_tol,
                abs_tol,
                0.9,
                0.0,
                0.333,
                6.0,
                h,
                0.0,
                MAX_STEPS,
                STIFFNESS_CHECKS,
                OutputType::Sparse,
            );
            finish(stepper.integrate(), stepper.x_out(), stepper.y_out())
        }
    };

    // A non-finite evaluation explains whatever the solver did afterwards.
    if let Some(err) = failure.borrow_mut().take() {
        return Err(SegmentError::Instability(err));
    }
    outcome
}

fn euler_step<M: VesselModel>(
    model: &M,
    segment: &Segment<'_>,
    initial: &VesselState,
    h: f64,
) -> Result<SegmentSolution, SegmentError> {
    let state = initial.with_time(segment.t);
    let derivatives = model.derivatives(
        segment.t,
        &state,
        segment.control,
        segment.env,
        segment.params,
    );
    check_finite_derivatives(&derivatives, segment.t)?;
    Ok(SegmentSolution {
        reached: segment.t_end,
        y: model.pack(&state.step(derivatives, h)),
        evaluations: 1,
    })
}

fn finish(
    result: Result<Stats, IntegrationError>,
    x_out: &[f64],
    y_out: &[Vector],
) -> Result<SegmentSolution, SegmentError> {
    let stats = result?;
    let (Some(&reached), Some(y)) = (x_out.last(), y_out.last()) else {
        return Err(SegmentError::NoOutput);
    };
    Ok(SegmentSolution {
        reached,
        y: (*y).into(),
        evaluations: stats.num_eval,
    })
}

/// Adapts a vessel model with frozen inputs into an `ode_solvers` system.
struct OdeSystem<'a, M> {
    model: &'a M,
    segment: &'a Segment<'a>,
    failure: Rc<RefCell<Option<NumericalInstability>>>,
}

impl<M: VesselModel> System<f64, Vector> for OdeSystem<'_, M> {
    fn system(&self, x: f64, y: &Vector, dy: &mut Vector) {
        let state = self.model.unpack(x, &(*y).into());
        let derivatives = self.model.derivatives(
            x,
            &state,
            self.segment.control,
            self.segment.env,
            self.segment.params,
        );
        if let Err(err) = check_finite_derivatives(&derivatives, x) {
            let mut failure = self.failure.borrow_mut();
            if failure.is_none() {
                *failure = Some(err);
            }
        }
        *dy = Vector::from_row_slice(&derivatives.pack());
    }

    fn solout(&mut self, _x: f64, _y: &Vector, _dy: &Vector) -> bool {
        // Stop as soon as any evaluation went non-finite.
        self.failure.borrow().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use keel_core::{Derivatives, ForceResult};

    /// Constant surge acceleration, no rotation.
    struct Accelerating {
        du: f64,
    }

    impl VesselModel for Accelerating {
        fn forces(
            &self,
            _state: &VesselState,
            _control: &ControlInput,
            _env: &EnvironmentSample,
            _params: &VesselParams,
        ) -> Result<ForceResult, NumericalInstability> {
            Ok(ForceResult::default())
        }

        fn derivatives(
            &self,
            _t: f64,
            state: &VesselState,
            _control: &ControlInput,
            _env: &EnvironmentSample,
            _params: &VesselParams,
        ) -> Derivatives {
            Derivatives {
                dx: state.u,
                du: self.du,
                ..Derivatives::default()
            }
        }
    }

    fn params() -> VesselParams {
        serde_json::from_str(
            r#"{
                "mass": 1.0, "yaw_inertia": 1.0,
                "x_u_dot": 0.0, "y_v_dot": 0.0, "n_r_dot": 0.0,
                "lpp": 10.0, "beam": 2.0, "draft": 1.0,
                "rpm_min": 0.0, "rpm_max": 1.0,
                "rudder_min": -0.5, "rudder_max": 0.5
            }"#,
        )
        .unwrap()
    }

    fn solve(model: &Accelerating, method: IntegrationMethod) -> Result<SegmentSolution, SegmentError> {
        let params = params();
        let control = ControlInput::default();
        let env = EnvironmentSample::calm();
        let segment = Segment {
            control: &control,
            env: &env,
            params: &params,
            t: 1.0,
            t_end: 3.0,
        };
        let initial = VesselState {
            t: 1.0,
            u: 1.0,
            ..VesselState::default()
        };
        solve_segment(
            model,
            &segment,
            &initial,
            method,
            Tolerances {
                rel_tol: 1e-9,
                abs_tol: 1e-12,
            },
        )
    }

    #[test]
    fn euler_takes_one_explicit_step() {
        let solution = solve(&Accelerating { du: 0.5 }, IntegrationMethod::Euler).unwrap();

        assert_eq!(solution.reached, 3.0);
        assert_eq!(solution.evaluations, 1);
        assert_relative_eq!(solution.y[0], 2.0);
        assert_relative_eq!(solution.y[3], 2.0);
    }

    #[test]
    fn higher_order_schemes_are_exact_for_constant_acceleration() {
        for method in [
            IntegrationMethod::Rk4,
            IntegrationMethod::Dopri5,
            IntegrationMethod::Dop853,
        ] {
            let solution = solve(&Accelerating { du: 0.5 }, method).unwrap();

            // x = u t + a t^2 / 2 over two seconds
            assert_relative_eq!(solution.reached, 3.0, epsilon = 1e-12);
            assert_relative_eq!(solution.y[0], 3.0, max_relative = 1e-9);
            assert_relative_eq!(solution.y[3], 2.0, max_relative = 1e-9);
            assert!(solution.evaluations > 0, "{method}");
        }
    }

    #[test]
    fn non_finite_derivatives_stop_every_scheme() {
        for method in [
            IntegrationMethod::Euler,
            IntegrationMethod::Rk4,
            IntegrationMethod::Dopri5,
            IntegrationMethod::Dop853,
        ] {
            let err = solve(&Accelerating { du: f64::NAN }, method).unwrap_err();

            assert!(
                matches!(
                    err,
                    SegmentError::Instability(NumericalInstability::NonFinite { component: "du", .. })
                ),
                "{method}: {err}"
            );
        }
    }
}
