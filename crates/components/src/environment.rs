//! Environment providers: constant conditions, or wind gusts and tidal
//! currents that vary over time.

use std::{f64::consts::TAU, fmt};

use keel_core::{EnvironmentConfig, EnvironmentProvider, EnvironmentSample, VesselState};
use tracing::debug;

/// A function of time returning `(speed, direction)`.
pub type TimeFunction = Box<dyn Fn(f64) -> (f64, f64)>;

/// The same sample at every query time.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StaticEnvironment(pub EnvironmentSample);

impl EnvironmentProvider for StaticEnvironment {
    fn sample(&self, _t: f64, _state: &VesselState) -> EnvironmentSample {
        self.0.clone()
    }
}

/// A sinusoidal variation about a mean, `amplitude * sin(2 pi t / period)`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Oscillation {
    amplitude: f64,
    period: f64,
}

impl Oscillation {
    fn at(self, t: f64) -> f64 {
        self.amplitude * (TAU * t / self.period).sin()
    }
}

/// Wind and current that vary over time around a base sample.
///
/// Wind gusts scale the mean speed by `1 + (gust_factor - 1) sin(2 pi t / T)`.
/// Tides add `amplitude sin(2 pi t / T)` to the mean current speed, never
/// letting it drop below zero. A custom wind or current function replaces the
/// corresponding built-in variation entirely.
pub struct TimeVaryingEnvironment {
    base: EnvironmentSample,
    gust: Option<Oscillation>,
    tide: Option<Oscillation>,
    wind_fn: Option<TimeFunction>,
    current_fn: Option<TimeFunction>,
}

impl TimeVaryingEnvironment {
    /// Starts from a base sample with no variation.
    #[must_use]
    pub fn new(base: EnvironmentSample) -> Self {
        Self {
            base,
            gust: None,
            tide: None,
            wind_fn: None,
            current_fn: None,
        }
    }

    /// Adds periodic gusts. Factors of 1 or less, or a non-positive period,
    /// leave the wind steady.
    #[must_use]
    pub fn with_gusts(self, gust_factor: f64, gust_period: f64) -> Self {
        let gust = (gust_factor > 1.0 && gust_period > 0.0).then_some(Oscillation {
            amplitude: gust_factor - 1.0,
            period: gust_period,
        });
        Self { gust, ..self }
    }

    /// Adds a tidal variation of the current speed. A zero amplitude or a
    /// non-positive period leaves the current steady.
    #[must_use]
    pub fn with_tide(self, amplitude: f64, period: f64) -> Self {
        let tide = (amplitude != 0.0 && period > 0.0).then_some(Oscillation { amplitude, period });
        Self { tide, ..self }
    }

    /// Replaces the wind with `f(t) = (speed, dir_from)`.
    #[must_use]
    pub fn with_wind_fn(self, f: impl Fn(f64) -> (f64, f64) + 'static) -> Self {
        Self {
            wind_fn: Some(Box::new(f)),
            ..self
        }
    }

    /// Replaces the current with `f(t) = (speed, dir_to)`.
    #[must_use]
    pub fn with_current_fn(self, f: impl Fn(f64) -> (f64, f64) + 'static) -> Self {
        Self {
            current_fn: Some(Box::new(f)),
            ..self
        }
    }
}

impl fmt::Debug for TimeVaryingEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeVaryingEnvironment")
            .field("base", &self.base)
            .field("gust", &self.gust)
            .field("tide", &self.tide)
            .field("wind_fn", &self.wind_fn.is_some())
            .field("current_fn", &self.current_fn.is_some())
            .finish()
    }
}

impl EnvironmentProvider for TimeVaryingEnvironment {
    fn sample(&self, t: f64, _state: &VesselState) -> EnvironmentSample {
        let mut sample = self.base.clone();

        if let Some(wind) = &self.wind_fn {
            (sample.wind_speed, sample.wind_dir_from) = wind(t);
        } else if let Some(gust) = self.gust {
            sample.wind_speed *= 1.0 + gust.at(t);
        }

        if let Some(current) = &self.current_fn {
            (sample.current_speed, sample.current_dir_to) = current(t);
        } else if let Some(tide) = self.tide {
            sample.current_speed = (sample.current_speed + tide.at(t)).max(0.0);
        }

        sample
    }
}

/// The environment provider selected by a scenario's environment block.
#[derive(Debug)]
pub enum EnvironmentModel {
    Static(StaticEnvironment),
    TimeVarying(TimeVaryingEnvironment),
}

impl EnvironmentModel {
    /// Builds a static provider unless gusts or tides are configured.
    #[must_use]
    pub fn from_config(config: &EnvironmentConfig) -> Self {
        let base = EnvironmentSample {
            sea_state: config.sea_state,
            depth: config.depth,
            ..EnvironmentSample::new(
                config.wind.speed,
                config.wind.dir_from,
                config.current.speed,
                config.current.dir_to,
            )
        };

        if !config.is_time_varying() {
            debug!(wind = base.wind_speed, current = base.current_speed, "static environment");
            return Self::Static(StaticEnvironment(base));
        }

        let mut provider = TimeVaryingEnvironment::new(base);
        if let (Some(factor), Some(period)) = (config.wind.gust_factor, config.wind.gust_period) {
            provider = provider.with_gusts(factor, period);
        }
        if let (Some(amplitude), Some(period)) =
            (config.current.tidal_amplitude, config.current.tidal_period)
        {
            provider = provider.with_tide(amplitude, period);
        }
        debug!(?provider, "time-varying environment");
        Self::TimeVarying(provider)
    }
}

impl Default for EnvironmentModel {
    fn default() -> Self {
        Self::Static(StaticEnvironment::default())
    }
}

impl EnvironmentProvider for EnvironmentModel {
    fn sample(&self, t: f64, state: &VesselState) -> EnvironmentSample {
        match self {
            Self::Static(provider) => provider.sample(t, state),
            Self::TimeVarying(provider) => provider.sample(t, state),
        }
    }
}
