use std::{fs, path::Path};

use anyhow::{Context, Result};
use keel_components::controller::ScheduleEntry;
use keel_core::{AutopilotConfig, ControlInput, EnvironmentConfig, SimulationConfig, VesselState};
use serde::Deserialize;

use crate::units::UnitsPolicy;

/// Initial pose and body velocities, in the document's units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct InitialState {
    pub x: f64,
    pub y: f64,
    pub psi: f64,
    pub u: f64,
    pub v: f64,
    pub r: f64,
}

/// How the vessel is commanded.
///
/// A schedule wins over an autopilot, which wins over a fixed command. With
/// none of them the actuators stay at zero.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct ControlBlock {
    pub schedule: Option<Vec<ScheduleEntry>>,
    pub autopilot: Option<AutopilotConfig>,
    pub fixed: Option<ControlInput>,
}

/// A scenario document as written on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioDocument {
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub units_policy: UnitsPolicy,
    #[serde(default)]
    pub initial_state: InitialState,
    #[serde(default)]
    pub control: ControlBlock,
    #[serde(default)]
    pub environment: Option<EnvironmentConfig>,
}

/// A scenario normalized to SI units and radians.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub config: SimulationConfig,
    pub initial: VesselState,
    pub control: ControlBlock,
}

impl ScenarioDocument {
    #[must_use]
    pub fn normalize(self) -> Scenario {
        let units = self.units_policy;
        let Self {
            simulation: mut config,
            initial_state: init,
            mut control,
            environment,
            ..
        } = self;

        let initial = VesselState {
            t: config.t0,
            x: init.x,
            y: init.y,
            psi: units.angle(init.psi),
            u: units.speed(init.u),
            v: units.speed(init.v),
            r: units.turn_rate(init.r),
        };

        if let Some(schedule) = &mut control.schedule {
            for entry in schedule {
                entry.command.rudder_angle = units.angle(entry.command.rudder_angle);
            }
        }
        if let Some(fixed) = &mut control.fixed {
            fixed.rudder_angle = units.angle(fixed.rudder_angle);
        }
        if let Some(autopilot) = &mut control.autopilot {
            autopilot.target_heading = units.angle(autopilot.target_heading);
            autopilot.target_speed = units.speed(autopilot.target_speed);
            autopilot.initial_rudder = units.angle(autopilot.initial_rudder);
        }

        if let Some(mut env) = environment.or(config.environment) {
            env.wind.speed = units.speed(env.wind.speed);
            env.wind.dir_from = units.angle(env.wind.dir_from);
            env.current.speed = units.speed(env.current.speed);
            env.current.dir_to = units.angle(env.current.dir_to);
            env.current.tidal_amplitude = env.current.tidal_amplitude.map(|a| units.speed(a));
            config.environment = Some(env);
        }
        config.autopilot = control.autopilot.or(config.autopilot);
        control.autopilot = config.autopilot;

        Scenario {
            config,
            initial,
            control,
        }
    }
}

/// Reads and normalizes a scenario.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid scenario.
pub fn load(path: &Path) -> Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let document: ScenarioDocument = serde_json::from_str(&text)
        .with_context(|| format!("parsing scenario {}", path.display()))?;
    Ok(document.normalize())
}
