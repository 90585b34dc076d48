//! Run configuration: time horizon, integration scheme, output cadence,
//! termination bounds, numerical safety thresholds, and the optional
//! autopilot and environment blocks a scenario may carry.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Integration scheme used for each frozen-input segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationMethod {
    /// One explicit Euler step per segment.
    Euler,
    /// One classical fourth-order Runge–Kutta step per segment.
    Rk4,
    /// Adaptive Dormand–Prince 5(4).
    #[default]
    Dopri5,
    /// Adaptive Dormand–Prince 8(5,3).
    Dop853,
}

impl IntegrationMethod {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Euler => "euler",
            Self::Rk4 => "rk4",
            Self::Dopri5 => "dopri5",
            Self::Dop853 => "dop853",
        }
    }

    /// Whether the scheme adapts its internal step to `rel_tol`/`abs_tol`.
    #[must_use]
    pub fn is_adaptive(self) -> bool {
        matches!(self, Self::Dopri5 | Self::Dop853)
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Axis-aligned position box. Unset sides are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminationBounds {
    pub x_min: Option<f64>,
    pub x_max: Option<f64>,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
}

/// Thresholds for the loop's numerical safety checks.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyLimits {
    /// Largest accepted change in `x` or `y` over one segment [m].
    pub max_position_jump: f64,
    /// Minimal solver advance as a fraction of `dt`.
    pub min_advance_fraction: f64,
    /// Absolute floor on the minimal solver advance [s].
    pub min_advance_floor: f64,
}

impl Default for SafetyLimits {
    fn default() -> Self {
        Self {
            max_position_jump: 1.0e6,
            min_advance_fraction: 1.0e-6,
            min_advance_floor: 1.0e-9,
        }
    }
}

impl SafetyLimits {
    /// The least time a segment solve must advance to count as progress.
    #[must_use]
    pub fn min_advance(&self, dt: f64) -> f64 {
        self.min_advance_floor.max(self.min_advance_fraction * dt)
    }
}

/// Gains and output saturation for one PID axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    pub out_min: f64,
    pub out_max: f64,
}

/// Rate autopilot settings: one PID per axis plus a fixed target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutopilotConfig {
    /// Heading axis, producing a rudder rate [rad/s].
    pub heading: PidGains,
    /// Speed axis, producing an RPM rate [RPM/s].
    pub speed: PidGains,
    /// Target heading [rad].
    pub target_heading: f64,
    /// Target speed over ground [m/s].
    pub target_speed: f64,
    #[serde(default)]
    pub initial_rpm: f64,
    #[serde(default)]
    pub initial_rudder: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Mean wind speed [m/s].
    pub speed: f64,
    /// Direction the wind comes from [rad].
    pub dir_from: f64,
    /// Peak-to-mean gust ratio. A value of 1 or less disables gusts.
    pub gust_factor: Option<f64>,
    /// Gust period [s].
    pub gust_period: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentConfig {
    /// Mean current speed [m/s].
    pub speed: f64,
    /// Direction the current flows to [rad].
    pub dir_to: f64,
    /// Tidal speed amplitude [m/s].
    pub tidal_amplitude: Option<f64>,
    /// Tidal period [s].
    pub tidal_period: Option<f64>,
}

/// Environment block of a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    pub wind: WindConfig,
    pub current: CurrentConfig,
    pub sea_state: Option<u8>,
    /// Water depth [m].
    pub depth: Option<f64>,
}

impl EnvironmentConfig {
    /// Whether any gust or tidal variation is configured.
    #[must_use]
    pub fn is_time_varying(&self) -> bool {
        let gusty = matches!(
            (self.wind.gust_factor, self.wind.gust_period),
            (Some(factor), Some(period)) if factor > 1.0 && period > 0.0
        );
        let tidal = matches!(
            (self.current.tidal_amplitude, self.current.tidal_period),
            (Some(amplitude), Some(period)) if amplitude != 0.0 && period > 0.0
        );
        gusty || tidal
    }
}

/// Configuration for one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub t0: f64,
    pub t_end: f64,
    /// Nominal segment length [s].
    pub dt: f64,
    #[serde(default)]
    pub method: IntegrationMethod,
    #[serde(default = "default_rel_tol")]
    pub rel_tol: f64,
    #[serde(default = "default_abs_tol")]
    pub abs_tol: f64,
    /// Emit a tick record every N-th step.
    #[serde(default = "default_decimation")]
    pub output_decimation: usize,
    /// Emit a stream event every N-th step.
    #[serde(default = "default_decimation")]
    pub stream_decimation: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub termination_bounds: Option<TerminationBounds>,
    #[serde(default)]
    pub safety: SafetyLimits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub autopilot: Option<AutopilotConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn default_rel_tol() -> f64 {
    1.0e-6
}

fn default_abs_tol() -> f64 {
    1.0e-9
}

fn default_decimation() -> usize {
    1
}

impl SimulationConfig {
    /// Creates a config over `[t0, t_end]` with all other fields at their defaults.
    #[must_use]
    pub fn new(t0: f64, t_end: f64, dt: f64) -> Self {
        Self {
            t0,
            t_end,
            dt,
            method: IntegrationMethod::default(),
            rel_tol: default_rel_tol(),
            abs_tol: default_abs_tol(),
            output_decimation: default_decimation(),
            stream_decimation: default_decimation(),
            termination_bounds: None,
            safety: SafetyLimits::default(),
            autopilot: None,
            environment: None,
            seed: None,
            notes: None,
        }
    }

    #[must_use]
    pub fn with_method(self, method: IntegrationMethod) -> Self {
        Self { method, ..self }
    }

    #[must_use]
    pub fn with_bounds(self, bounds: TerminationBounds) -> Self {
        Self {
            termination_bounds: Some(bounds),
            ..self
        }
    }

    #[must_use]
    pub fn with_decimation(self, output: usize, stream: usize) -> Self {
        Self {
            output_decimation: output,
            stream_decimation: stream,
            ..self
        }
    }

    /// End of segment `k`, clamped to `t_end`.
    ///
    /// Boundaries are computed from `t0` rather than accumulated, so the final
    /// segment lands exactly on `t_end`. A boundary closer to `t_end` than the
    /// minimal advance snaps to `t_end`, which keeps rounding from leaving a
    /// sliver segment at the end of the horizon.
    #[must_use]
    pub fn segment_end(&self, k: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let boundary = self.t0 + (k + 1) as f64 * self.dt;
        if self.t_end - boundary < self.safety.min_advance(self.dt) {
            self.t_end
        } else {
            boundary
        }
    }
}
