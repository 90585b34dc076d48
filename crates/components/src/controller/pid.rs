use std::f64::consts::{PI, TAU};

use keel_core::PidGains;

/// Smallest time step used for the integral and derivative terms [s].
const MIN_DT: f64 = 1.0e-9;

/// Wraps an angle into `(-pi, pi]`.
#[must_use]
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { wrapped + TAU } else { wrapped }
}

/// One PID axis with clamped output and conditional-integration anti-windup.
///
/// The axis keeps its own integral, previous error, and previous update time.
/// The first update has no elapsed time, so it contributes only the
/// proportional term. While the output is saturated the integral is frozen.
#[derive(Debug, Clone, PartialEq)]
pub struct PidAxis {
    gains: PidGains,
    integral: f64,
    last_error: Option<f64>,
    last_time: Option<f64>,
}

impl PidAxis {
    #[must_use]
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            integral: 0.0,
            last_error: None,
            last_time: None,
        }
    }

    #[must_use]
    pub fn gains(&self) -> &PidGains {
        &self.gains
    }

    #[must_use]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    /// Computes the clamped output for `error` observed at time `t`.
    pub fn update(&mut self, t: f64, error: f64) -> f64 {
        let PidGains {
            kp,
            ki,
            kd,
            out_min,
            out_max,
        } = self.gains;

        let dt = self.last_time.map_or(0.0, |last| (t - last).max(MIN_DT));
        let derivative = match self.last_error {
            Some(last) if dt > 0.0 => (error - last) / dt,
            _ => 0.0,
        };

        let candidate = self.integral + error * dt;
        let unclamped = kp * error + ki * candidate + kd * derivative;
        let output = unclamped.clamp(out_min, out_max);
        if output == unclamped {
            self.integral = candidate;
        }

        self.last_error = Some(error);
        self.last_time = Some(t);
        output
    }

    /// Forgets the integral and the previous sample.
    pub fn reset(&mut self) {
        self.integral = 0.0;
        self.last_error = None;
        self.last_time = None;
    }
}
