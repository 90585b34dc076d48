use std::{fs, path::Path};

use anyhow::{Context, Result};
use keel_components::{
    DynamicsModel,
    controller::{AutopilotProvider, FixedCommand, FixedTarget, ScheduledControl},
    environment::EnvironmentModel,
};
use keel_core::{
    ControlInput, ControlProvider, ControlSignal, Observer, Target, VesselParams, VesselState,
    validation::{validate_config, validate_initial_state, validate_params},
};
use keel_observers::{CsvSink, JsonSummaryWriter, JsonlSink, Recorder, TraceObserver};
use keel_solvers::simulation::{self, Action, Event, Summary};
use tracing::info;

use crate::scenario::{ControlBlock, Scenario};

pub const CSV_FILE: &str = "results.csv";
pub const JSONL_FILE: &str = "results.jsonl";
pub const SUMMARY_FILE: &str = "summary.json";

/// The control provider a scenario selects.
#[derive(Debug, Clone)]
pub enum ScenarioControl {
    Scheduled(ScheduledControl),
    Autopilot(AutopilotProvider<FixedTarget>),
    Fixed(FixedCommand),
}

impl ScenarioControl {
    /// Picks the schedule, then the autopilot, then the fixed command.
    ///
    /// # Errors
    ///
    /// Returns an error if the schedule is invalid.
    pub fn from_block(block: &ControlBlock) -> Result<Self> {
        if let Some(entries) = &block.schedule {
            let schedule = ScheduledControl::new(entries.clone()).context("control schedule")?;
            return Ok(Self::Scheduled(schedule));
        }
        if let Some(autopilot) = &block.autopilot {
            return Ok(Self::Autopilot(AutopilotProvider::from_config(autopilot)));
        }
        Ok(Self::Fixed(FixedCommand(block.fixed.unwrap_or_default())))
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Scheduled(_) => "schedule",
            Self::Autopilot(_) => "autopilot",
            Self::Fixed(_) => "fixed",
        }
    }
}

impl ControlProvider for ScenarioControl {
    fn current(&self) -> ControlInput {
        match self {
            Self::Scheduled(provider) => provider.current(),
            Self::Autopilot(provider) => provider.current(),
            Self::Fixed(provider) => provider.current(),
        }
    }

    fn target(&self) -> Option<Target> {
        match self {
            Self::Scheduled(provider) => provider.target(),
            Self::Autopilot(provider) => provider.target(),
            Self::Fixed(provider) => provider.target(),
        }
    }

    fn compute(&mut self, t: f64, state: &VesselState, target: Option<&Target>) -> ControlSignal {
        match self {
            Self::Scheduled(provider) => provider.compute(t, state, target),
            Self::Autopilot(provider) => provider.compute(t, state, target),
            Self::Fixed(provider) => provider.compute(t, state, target),
        }
    }
}

/// Validates the inputs, runs the scenario, and writes the three output files
/// into `out_dir`.
///
/// A run that terminates early still writes all outputs and returns its
/// summary.
///
/// # Errors
///
/// Returns an error for invalid inputs, before any file is created, and for
/// any failure to write the outputs.
pub fn execute(params: &VesselParams, scenario: Scenario, out_dir: &Path) -> Result<Summary> {
    let Scenario {
        config,
        initial,
        control,
    } = scenario;

    validate_params(params).context("invalid ship")?;
    validate_config(&config).context("invalid scenario")?;
    validate_initial_state(&initial).context("invalid initial state")?;
    let control = ScenarioControl::from_block(&control)?;
    let environment = config
        .environment
        .as_ref()
        .map(EnvironmentModel::from_config)
        .unwrap_or_default();

    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;
    let create = |name: &str| out_dir.join(name);
    let mut recorder = Recorder::new()
        .with_sink(CsvSink::create(create(CSV_FILE)).context(CSV_FILE)?)
        .with_sink(JsonlSink::create(create(JSONL_FILE)).context(JSONL_FILE)?)
        .with_summary(JsonSummaryWriter::create(create(SUMMARY_FILE)).context(SUMMARY_FILE)?);
    let mut trace = TraceObserver::default();

    info!(control = control.name(), out_dir = %out_dir.display(), "running scenario");
    let result = simulation::run(
        &DynamicsModel::default(),
        params,
        &config,
        initial,
        control,
        environment,
        |event: &Event| -> Option<Action> {
            let traced: Option<Action> = trace.observe(event);
            recorder.observe(event).or(traced)
        },
    )?;

    if let Some(err) = recorder.take_error() {
        return Err(err).context("writing run outputs");
    }
    Ok(result.summary())
}

#[cfg(test)]
mod tests {
    use super::*;

    use keel_components::controller::ScheduleEntry;

    #[test]
    fn schedule_takes_precedence_over_autopilot_and_fixed() {
        let block = ControlBlock {
            schedule: Some(vec![ScheduleEntry {
                t: 0.0,
                command: ControlInput::new(10.0, 0.0),
            }]),
            autopilot: None,
            fixed: Some(ControlInput::new(20.0, 0.0)),
        };

        let control = ScenarioControl::from_block(&block).unwrap();

        assert_eq!(control.name(), "schedule");
        assert_eq!(control.current().rpm, 10.0);
    }

    #[test]
    fn no_control_block_means_zero_commands() {
        let mut control = ScenarioControl::from_block(&ControlBlock::default()).unwrap();

        assert_eq!(control.name(), "fixed");
        assert_eq!(
            control.compute(0.0, &VesselState::default(), None),
            ControlSignal::Absolute(ControlInput::default())
        );
    }

    #[test]
    fn duplicate_schedule_times_are_rejected() {
        let entry = ScheduleEntry {
            t: 1.0,
            command: ControlInput::default(),
        };
        let block = ControlBlock {
            schedule: Some(vec![entry, entry]),
            ..ControlBlock::default()
        };

        assert!(ScenarioControl::from_block(&block).is_err());
    }
}
