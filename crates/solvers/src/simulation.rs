//! The segmented simulation loop.
//!
//! The horizon `[t0, t_end]` is split into segments of length `dt`. For each
//! segment the loop samples the control provider and the environment at the
//! segment start, validates the command, integrates the vessel state across
//! the segment with those inputs frozen, and checks the new state:
//!
//! ```text
//! state_k --control, env at t_k--> solve [t_k, t_k+1] --checks--> state_k+1
//! ```
//!
//! Solver failures, numerical instabilities, termination bounds, and observer
//! aborts end the run early with a [`TerminationReason`]; they are reported in
//! the [`RunResult`] rather than returned as errors.
//!
//! # Example
//!
//! ```ignore
//! use keel_solvers::simulation;
//!
//! let result = simulation::run(&model, &params, &config, initial, control, env, ())?;
//! println!("{}", result.summary().reason);
//! ```

mod action;
mod event;
mod metrics;
mod record;
mod solution;

pub use action::Action;
pub use event::Event;
pub use metrics::PerformanceMetrics;
pub use solution::{RunResult, Status, Summary, TerminationReason};

use std::time::Instant;

use keel_core::{
    ConfigError, ControlProvider, EnvironmentProvider, Observer, SimulationConfig, VesselModel,
    VesselParams, VesselState,
    validation::{
        apply_termination_bounds, check_finite_derivatives, detect_numerical_issue,
        validate_config, validate_initial_state, validate_params,
    },
};
use keel_components::controller::ActuatorIntegrator;
use tracing::{debug, info, warn};

use crate::ode::{Segment, SegmentError, Tolerances, solve_segment};

use metrics::MetricsClock;
use record::{Commands, tick_record};

/// Runs one simulation.
///
/// # Algorithm
///
/// For each segment `k` from `t` to `t_next = min(t0 + (k + 1) dt, t_end)`:
///
/// 1. Compute the control signal at `t` from the current state and turn it
///    into an absolute command through the actuator integrator.
/// 2. Sample the environment at `t`.
/// 3. Validate the command and compute forces and derivatives at `t`.
/// 4. Integrate the state to `t_next` with control and environment frozen.
/// 5. Reject non-finite states and implausible position jumps.
/// 6. Emit a tick every `output_decimation` steps and a stream event every
///    `stream_decimation` steps, describing the state at `t`.
/// 7. Accept the new state and check the termination bounds.
///
/// # Observer
///
/// The observer receives [`Event::Tick`] and [`Event::Stream`] events and may
/// answer [`Action::Abort`] to stop the run. It receives [`Event::Finished`]
/// exactly once, whatever the outcome.
///
/// # Errors
///
/// Returns an error if the vessel parameters, the configuration, or the
/// initial state are invalid. Nothing is simulated in that case.
pub fn run<M, C, E, O>(
    model: &M,
    params: &VesselParams,
    config: &SimulationConfig,
    initial: VesselState,
    mut control: C,
    environment: E,
    mut observer: O,
) -> Result<RunResult, ConfigError>
where
    M: VesselModel,
    C: ControlProvider,
    E: EnvironmentProvider,
    O: Observer<Event, Action>,
{
    validate_params(params)?;
    validate_config(config)?;
    validate_initial_state(&initial)?;

    info!(
        t0 = config.t0,
        t_end = config.t_end,
        dt = config.dt,
        method = %config.method,
        vessel = params.name.as_deref().unwrap_or("unnamed"),
        "starting run"
    );

    let mut clock = MetricsClock::start();
    let min_advance = config.safety.min_advance(config.dt);
    let tolerances = Tolerances {
        rel_tol: config.rel_tol,
        abs_tol: config.abs_tol,
    };
    let mut actuators = ActuatorIntegrator::new(&control.current(), params);

    let mut state = initial.with_time(config.t0);
    let mut step = 0;
    let mut reason = None;

    while state.t < config.t_end {
        let t = state.t;
        let t_next = config.segment_end(step);
        if t_next - t < min_advance {
            reason = Some(TerminationReason::SolverStagnationNoTimeAdvance);
            break;
        }

        let target = control.target();
        let signal = control.compute(t, &state, target.as_ref());
        let command = actuators.apply(signal, t_next - t, params);
        let env = environment.sample(t, &state);

        let forces = match model.forces(&state, &command, &env, params) {
            Ok(forces) => forces,
            Err(err) => {
                reason = Some(TerminationReason::NumericalInstability(err));
                break;
            }
        };
        let derivatives = model.derivatives(t, &state, &command, &env, params);
        if let Err(err) = check_finite_derivatives(&derivatives, t) {
            reason = Some(TerminationReason::NumericalInstability(err));
            break;
        }

        let segment = Segment {
            control: &command,
            env: &env,
            params,
            t,
            t_end: t_next,
        };
        let solve_started = Instant::now();
        let solved = solve_segment(model, &segment, &state, config.method, tolerances);
        let elapsed = solve_started.elapsed();

        let solution = match solved {
            Ok(solution) => solution,
            Err(err) => {
                clock.record_solve(elapsed, 0);
                reason = Some(match err {
                    SegmentError::Integration(message) => TerminationReason::SolverFailed(message),
                    SegmentError::NoOutput => TerminationReason::SolverNoOutput,
                    SegmentError::Instability(err) => TerminationReason::NumericalInstability(err),
                });
                break;
            }
        };
        clock.record_solve(elapsed, solution.evaluations);

        if solution.reached - t < min_advance {
            reason = Some(TerminationReason::SolverStagnationInternal);
            break;
        }

        let next = model.unpack(t_next, &solution.y);
        if let Err(err) = detect_numerical_issue(&state, &next, config.safety.max_position_jump) {
            reason = Some(TerminationReason::NumericalInstability(err));
            break;
        }

        debug!(step, t, t_next, evaluations = solution.evaluations, "segment accepted");

        let mut action = None;
        if step % config.output_decimation == 0 {
            let commands = Commands {
                rpm: actuators.rpm(),
                rudder: actuators.rudder(),
            };
            let record = tick_record(&state, &command, &env, &forces, commands);
            action = observer.observe(&Event::Tick { step, record });
        }
        if step % config.stream_decimation == 0 {
            let streamed = observer.observe(&Event::Stream {
                step,
                state,
                control: command,
            });
            action = action.or(streamed);
        }

        state = next;
        step += 1;

        if let Some(Action::Abort(abort)) = action {
            reason = Some(TerminationReason::Aborted(abort));
            break;
        }
        if let Some(bound) = apply_termination_bounds(&state, config) {
            reason = Some(TerminationReason::OutOfBounds(bound));
            break;
        }
    }

    let status = if reason.is_none() && state.t >= config.t_end {
        Status::Completed
    } else {
        Status::Terminated
    };
    let result = RunResult {
        status,
        reason,
        end_time: state.t,
        ticks: step,
        dt: config.dt,
        final_state: state,
        metrics: clock.finish(state.t - config.t0),
    };

    match &result.reason {
        Some(reason) => warn!(%reason, t = result.end_time, ticks = result.ticks, "run terminated"),
        None => info!(
            t = result.end_time,
            ticks = result.ticks,
            wall_time = result.metrics.total_wall_time,
            "run completed"
        ),
    }

    // The run is over, so a late abort request has nothing left to stop.
    let _ = observer.observe(&Event::Finished(result.clone()));
    Ok(result)
}

/// Runs one simulation without observation.
///
/// This is a convenience wrapper around [`run`] that discards events.
///
/// # Errors
///
/// Returns an error if the vessel parameters, the configuration, or the
/// initial state are invalid.
pub fn run_unobserved<M, C, E>(
    model: &M,
    params: &VesselParams,
    config: &SimulationConfig,
    initial: VesselState,
    control: C,
    environment: E,
) -> Result<RunResult, ConfigError>
where
    M: VesselModel,
    C: ControlProvider,
    E: EnvironmentProvider,
{
    run(model, params, config, initial, control, environment, ())
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use keel_components::{
        DynamicsModel, ForceAggregator,
        controller::{
            AutopilotProvider, FixedCommand, PidAxis, RateAutopilot, ScheduleEntry,
            ScheduledControl,
        },
        environment::StaticEnvironment,
        example::coastal_vessel,
    };
    use keel_core::{
        Bound, ControlInput, ControlRate, ControlSignal, Derivatives, EnvironmentSample,
        ForceResult, IntegrationMethod, NumericalInstability, PidGains, SafetyLimits, Target,
        TerminationBounds,
    };

    fn calm() -> StaticEnvironment {
        StaticEnvironment(EnvironmentSample::calm())
    }

    #[test]
    fn invalid_inputs_are_rejected_before_running() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 10.0, -1.0);

        let result = run(
            &DynamicsModel::default(),
            &params,
            &config,
            VesselState::default(),
            FixedCommand::default(),
            calm(),
            (),
        );

        assert!(matches!(result, Err(ConfigError::TimeStep(_))));
    }

    #[test]
    fn completes_with_every_tick_observed() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 10.0, 0.5).with_method(IntegrationMethod::Rk4);
        let mut ticks = Vec::new();
        let mut finished = 0;

        let result = run(
            &DynamicsModel::default(),
            &params,
            &config,
            VesselState::default(),
            FixedCommand(ControlInput::new(50.0, 0.0)),
            calm(),
            |event: &Event| {
                match event {
                    Event::Tick { record, .. } => ticks.push(record.get("t")),
                    Event::Finished(_) => finished += 1,
                    Event::Stream { .. } => {}
                }
                None
            },
        )
        .unwrap();

        assert_eq!(result.status, Status::Completed);
        assert_eq!(result.reason, None);
        assert_eq!(result.ticks, 20);
        assert_eq!(result.end_time, 10.0);
        assert_eq!(ticks.len(), 20);
        assert_eq!(ticks[0], 0.0);
        assert_relative_eq!(ticks[19], 9.5);
        assert_eq!(finished, 1);
        assert_eq!(result.metrics.solver_calls, 20);
        assert!(result.metrics.derivative_evaluations >= 80);
    }

    #[test]
    fn decimation_thins_ticks_and_stream_independently() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 5.0, 0.5)
            .with_method(IntegrationMethod::Euler)
            .with_decimation(3, 2);
        let mut tick_steps = Vec::new();
        let mut stream_steps = Vec::new();

        run(
            &DynamicsModel::default(),
            &params,
            &config,
            VesselState::default(),
            FixedCommand::default(),
            calm(),
            |event: &Event| {
                match event {
                    Event::Tick { step, .. } => tick_steps.push(*step),
                    Event::Stream { step, .. } => stream_steps.push(*step),
                    Event::Finished(_) => {}
                }
                None
            },
        )
        .unwrap();

        assert_eq!(tick_steps, vec![0, 3, 6, 9]);
        assert_eq!(stream_steps, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn drifting_vessel_leaves_through_x_max() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 200.0, 1.0).with_bounds(TerminationBounds {
            x_max: Some(100.0),
            ..TerminationBounds::default()
        });
        let initial = VesselState {
            x: 0.5,
            u: 2.0,
            ..VesselState::default()
        };

        let result = run_unobserved(
            &DynamicsModel::new(ForceAggregator::empty()),
            &params,
            &config,
            initial,
            FixedCommand::default(),
            calm(),
        )
        .unwrap();

        assert_eq!(result.status, Status::Terminated);
        assert_eq!(result.reason, Some(TerminationReason::OutOfBounds(Bound::XAbove)));
        assert_eq!(result.summary().reason, "x above bound");
        assert_relative_eq!(result.final_state.x, 100.5, max_relative = 1e-9);
        assert_relative_eq!(result.end_time, 50.0);
        assert_eq!(result.ticks, 50);
    }

    #[test]
    fn observer_abort_stops_the_run() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 10.0, 1.0);

        let result = run(
            &DynamicsModel::default(),
            &params,
            &config,
            VesselState::default(),
            FixedCommand::default(),
            calm(),
            |event: &Event| match event {
                Event::Tick { step: 3, .. } => Some(Action::abort("enough")),
                _ => None,
            },
        )
        .unwrap();

        assert_eq!(result.status, Status::Terminated);
        assert_eq!(result.ticks, 4);
        assert_eq!(result.summary().reason, "run aborted: enough");
    }

    #[test]
    fn out_of_range_command_terminates_with_numerical_instability() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 10.0, 1.0);
        let schedule = ScheduledControl::new(vec![
            ScheduleEntry {
                t: 0.0,
                command: ControlInput::new(30.0, 0.0),
            },
            ScheduleEntry {
                t: 2.0,
                command: ControlInput::new(500.0, 0.0),
            },
        ])
        .unwrap();

        let result = run(
            &DynamicsModel::default(),
            &params,
            &config,
            VesselState::default(),
            schedule,
            calm(),
            (),
        )
        .unwrap();

        assert_eq!(result.ticks, 2);
        assert_relative_eq!(result.end_time, 2.0);
        let Some(TerminationReason::NumericalInstability(NumericalInstability::OutOfBounds {
            component,
            time,
            ..
        })) = &result.reason
        else {
            panic!("unexpected reason {:?}", result.reason);
        };
        assert_eq!(*component, "rpm");
        assert_relative_eq!(*time, 2.0);
    }

    /// Emits a constant rudder rate and records the targets it is handed.
    struct Slewing {
        seen_targets: usize,
    }

    impl ControlProvider for Slewing {
        fn current(&self) -> ControlInput {
            ControlInput::default()
        }

        fn target(&self) -> Option<Target> {
            Some(Target {
                heading: 1.0,
                speed: 0.0,
            })
        }

        fn compute(&mut self, _t: f64, _state: &VesselState, target: Option<&Target>) -> ControlSignal {
            if target.is_some() {
                self.seen_targets += 1;
            }
            ControlSignal::Rate(ControlRate {
                rpm_rate: 0.0,
                rudder_rate: 0.1,
            })
        }
    }

    #[test]
    fn rate_commands_are_integrated_over_each_segment() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 10.0, 0.5).with_method(IntegrationMethod::Euler);
        let mut provider = Slewing { seen_targets: 0 };
        let mut rudder = Vec::new();

        run(
            &DynamicsModel::default(),
            &params,
            &config,
            VesselState::default(),
            &mut provider,
            calm(),
            |event: &Event| {
                if let Event::Tick { record, .. } = event {
                    rudder.push(record.get("rudder_cmd"));
                }
                None
            },
        )
        .unwrap();

        assert_eq!(provider.seen_targets, 20);
        assert_relative_eq!(rudder[0], 0.05);
        assert_relative_eq!(rudder[5], 0.3, max_relative = 1e-12);
        assert_relative_eq!(rudder[19], params.rudder_max);
    }

    #[test]
    fn moving_target_reaches_the_autopilot() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 10.0, 0.5).with_method(IntegrationMethod::Euler);
        let heading = PidGains {
            kp: 1.0,
            ki: 0.0,
            kd: 0.0,
            out_min: -0.05,
            out_max: 0.05,
        };
        let speed = PidGains {
            kp: 0.0,
            out_min: -1.0,
            out_max: 1.0,
            ..heading
        };
        let control = AutopilotProvider::new(
            RateAutopilot::new(PidAxis::new(heading), PidAxis::new(speed)),
            |t: f64, _: &VesselState| Target {
                heading: if t >= 5.0 { 1.0 } else { 0.0 },
                speed: 0.0,
            },
            ControlInput::default(),
        );
        let mut rudder = Vec::new();

        run(
            &DynamicsModel::default(),
            &params,
            &config,
            VesselState::default(),
            control,
            calm(),
            |event: &Event| {
                if let Event::Tick { record, .. } = event {
                    rudder.push((record.get("t"), record.get("rudder_cmd")));
                }
                None
            },
        )
        .unwrap();

        assert_eq!(rudder.len(), 20);
        for &(t, cmd) in &rudder[..10] {
            assert_eq!(cmd, 0.0, "rudder moved at t = {t}");
        }
        assert_relative_eq!(rudder[10].0, 5.0);
        assert_relative_eq!(rudder[10].1, 0.025, max_relative = 1e-9);
        assert!(rudder[19].1 > rudder[10].1);
    }

    /// Wraps a force-free hull and rewrites its derivatives once `t` passes
    /// `from`.
    struct Glitching {
        inner: DynamicsModel,
        from: f64,
        glitch: fn(&mut Derivatives, &VesselState),
    }

    impl Glitching {
        fn new(from: f64, glitch: fn(&mut Derivatives, &VesselState)) -> Self {
            Self {
                inner: DynamicsModel::new(ForceAggregator::empty()),
                from,
                glitch,
            }
        }
    }

    impl VesselModel for Glitching {
        fn forces(
            &self,
            state: &VesselState,
            control: &ControlInput,
            env: &EnvironmentSample,
            params: &VesselParams,
        ) -> Result<ForceResult, NumericalInstability> {
            self.inner.forces(state, control, env, params)
        }

        fn derivatives(
            &self,
            t: f64,
            state: &VesselState,
            control: &ControlInput,
            env: &EnvironmentSample,
            params: &VesselParams,
        ) -> Derivatives {
            let mut derivatives = self.inner.derivatives(t, state, control, env, params);
            if t > self.from {
                (self.glitch)(&mut derivatives, state);
            }
            derivatives
        }
    }

    fn drifting() -> VesselState {
        VesselState {
            u: 1.0,
            ..VesselState::default()
        }
    }

    #[test]
    fn position_jump_keeps_the_last_accepted_state() {
        let params = coastal_vessel();
        let config = SimulationConfig {
            safety: SafetyLimits {
                max_position_jump: 5.0,
                ..SafetyLimits::default()
            },
            ..SimulationConfig::new(0.0, 10.0, 1.0).with_method(IntegrationMethod::Euler)
        };
        let model = Glitching::new(2.5, |derivatives, _| derivatives.dx = 50.0);

        let result = run_unobserved(
            &model,
            &params,
            &config,
            drifting(),
            FixedCommand::default(),
            calm(),
        )
        .unwrap();

        assert_eq!(result.status, Status::Terminated);
        let Some(TerminationReason::NumericalInstability(NumericalInstability::PositionJump {
            dx,
            time,
            ..
        })) = result.reason
        else {
            panic!("unexpected reason {:?}", result.reason);
        };
        assert_relative_eq!(dx, 50.0, max_relative = 1e-12);
        assert_relative_eq!(time, 4.0);
        assert_eq!(result.ticks, 3);
        assert_relative_eq!(result.end_time, 3.0);
        assert_relative_eq!(result.final_state.t, 3.0);
        assert_relative_eq!(result.final_state.x, 3.0, max_relative = 1e-12);
    }

    #[test]
    fn non_finite_derivative_inside_a_segment_stops_the_run() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 10.0, 1.0).with_method(IntegrationMethod::Rk4);
        let model = Glitching::new(3.2, |derivatives, _| derivatives.du = f64::NAN);

        let result = run_unobserved(
            &model,
            &params,
            &config,
            drifting(),
            FixedCommand::default(),
            calm(),
        )
        .unwrap();

        assert_eq!(result.status, Status::Terminated);
        let Some(TerminationReason::NumericalInstability(NumericalInstability::NonFinite {
            component,
            time,
            ..
        })) = result.reason
        else {
            panic!("unexpected reason {:?}", result.reason);
        };
        assert_eq!(component, "du");
        assert!(time > 3.2 && time <= 4.0, "detected at t = {time}");
        assert_eq!(result.ticks, 3);
        assert_relative_eq!(result.end_time, 3.0);
        assert_relative_eq!(result.final_state.x, 3.0, max_relative = 1e-9);
        assert!(result.final_state.u.is_finite());
    }

    #[test]
    fn non_finite_derivative_at_a_segment_start_stops_the_run() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 10.0, 1.0).with_method(IntegrationMethod::Euler);
        let model = Glitching::new(1.5, |derivatives, _| derivatives.dr = f64::INFINITY);

        let result = run_unobserved(
            &model,
            &params,
            &config,
            drifting(),
            FixedCommand::default(),
            calm(),
        )
        .unwrap();

        assert_eq!(
            result.reason,
            Some(TerminationReason::NumericalInstability(NumericalInstability::NonFinite {
                component: "dr",
                value: f64::INFINITY,
                time: 2.0,
            }))
        );
        assert_eq!(result.ticks, 2);
        assert_relative_eq!(result.end_time, 2.0);
        assert_relative_eq!(result.final_state.x, 2.0, max_relative = 1e-12);
    }

    #[test]
    fn solver_failure_is_reported_without_advancing() {
        let params = coastal_vessel();
        let config = SimulationConfig::new(0.0, 10.0, 1.0).with_method(IntegrationMethod::Dopri5);
        // Far too stiff for an explicit scheme to cross one segment within
        // its step budget.
        let model = Glitching::new(f64::NEG_INFINITY, |derivatives, state| {
            derivatives.du = -1.0e12 * state.u;
        });

        let result = run_unobserved(
            &model,
            &params,
            &config,
            drifting(),
            FixedCommand::default(),
            calm(),
        )
        .unwrap();

        assert_eq!(result.status, Status::Terminated);
        assert!(
            matches!(result.reason, Some(TerminationReason::SolverFailed(_))),
            "unexpected reason {:?}",
            result.reason
        );
        assert_eq!(result.ticks, 0);
        assert_eq!(result.end_time, 0.0);
        assert_eq!(result.final_state, drifting());
        assert_eq!(result.metrics.solver_calls, 1);
    }
}
