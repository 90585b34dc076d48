use thiserror::Error;

/// Invalid static parameters or configuration.
///
/// Always raised before a run starts and never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("mass must be finite and positive, got {0}")]
    Mass(f64),

    #[error("yaw inertia must be finite and positive, got {0}")]
    YawInertia(f64),

    #[error("{name} must be finite and positive, got {value}")]
    Dimension { name: &'static str, value: f64 },

    #[error("rpm_min ({min}) must be less than rpm_max ({max})")]
    RpmRange { min: f64, max: f64 },

    #[error("rudder_min ({min}) must be less than rudder_max ({max})")]
    RudderRange { min: f64, max: f64 },

    #[error("dt must be finite and positive, got {0}")]
    TimeStep(f64),

    #[error("t0 must be finite, got {0}")]
    StartTime(f64),

    #[error("t_end ({t_end}) must be finite and greater than t0 ({t0})")]
    Horizon { t0: f64, t_end: f64 },

    #[error("decimation factors must be positive")]
    Decimation,

    #[error("{name} must be finite and positive, got {value}")]
    Tolerance { name: &'static str, value: f64 },

    #[error("{name} must be finite and positive, got {value}")]
    Safety { name: &'static str, value: f64 },

    #[error("termination bounds on {axis} are inverted: min {min} > max {max}")]
    TerminationBounds { axis: &'static str, min: f64, max: f64 },

    #[error("initial state component {component} is not finite: {value}")]
    InitialState { component: &'static str, value: f64 },

    #[error("{axis} PID gains must be finite with out_min <= out_max")]
    PidGains { axis: &'static str },

    #[error("control schedule entry {index} has an invalid or duplicate time {time}")]
    ScheduleTime { index: usize, time: f64 },
}

/// A fatal numerical problem detected during a run.
///
/// Each variant carries enough context to locate the failure: the offending
/// component, its value, the bounds it violated, and the simulation time.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum NumericalInstability {
    #[error("non-finite {component} = {value} at t = {time}")]
    NonFinite {
        component: &'static str,
        value: f64,
        time: f64,
    },

    #[error("{component} = {value} outside [{min}, {max}] at t = {time}")]
    OutOfBounds {
        component: &'static str,
        value: f64,
        min: f64,
        max: f64,
        time: f64,
    },

    #[error("position jump (dx = {dx}, dy = {dy}) exceeds {threshold} at t = {time}")]
    PositionJump {
        dx: f64,
        dy: f64,
        threshold: f64,
        time: f64,
    },
}

impl NumericalInstability {
    /// Simulation time at which the instability was detected.
    #[must_use]
    pub fn time(&self) -> f64 {
        match self {
            Self::NonFinite { time, .. }
            | Self::OutOfBounds { time, .. }
            | Self::PositionJump { time, .. } => *time,
        }
    }
}

/// External or policy-driven termination of a run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("run aborted: {reason}")]
pub struct RuntimeAbort {
    pub reason: String,
}

impl RuntimeAbort {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Any error raised by the simulation core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Numerical(#[from] NumericalInstability),

    #[error(transparent)]
    Abort(#[from] RuntimeAbort),
}
