use keel_core::{ConfigError, ControlInput, ControlProvider, ControlSignal, Target, VesselState};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// An absolute command taking effect at time `t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Time the command takes effect [s].
    pub t: f64,
    #[serde(flatten)]
    pub command: ControlInput,
}

/// Scripted absolute commands with step-hold semantics.
///
/// Each command holds from its breakpoint until the next one. Before the first
/// breakpoint the first command applies, and the last command holds forever
/// after the last breakpoint. An empty schedule commands nothing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScheduledControl {
    entries: Vec<ScheduleEntry>,
}

impl ScheduledControl {
    /// Sorts the entries by time.
    ///
    /// # Errors
    ///
    /// Returns an error if any time is non-finite or two entries share a time.
    pub fn new(mut entries: Vec<ScheduleEntry>) -> Result<Self, ConfigError> {
        if let Some((index, entry)) = entries.iter().enumerate().find(|(_, e)| !e.t.is_finite()) {
            return Err(ConfigError::ScheduleTime {
                index,
                time: entry.t,
            });
        }

        entries.sort_by(|a, b| a.t.total_cmp(&b.t));
        if let Some(index) = entries.windows(2).position(|pair| pair[0].t == pair[1].t) {
            return Err(ConfigError::ScheduleTime {
                index: index + 1,
                time: entries[index + 1].t,
            });
        }

        debug!(breakpoints = entries.len(), "control schedule");
        Ok(Self { entries })
    }

    #[must_use]
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// The command in effect at time `t`.
    #[must_use]
    pub fn command_at(&self, t: f64) -> ControlInput {
        let after = self.entries.partition_point(|entry| entry.t <= t);
        let index = after.saturating_sub(1);
        self.entries
            .get(index)
            .map(|entry| entry.command)
            .unwrap_or_default()
    }
}

impl ControlProvider for ScheduledControl {
    fn current(&self) -> ControlInput {
        self.entries
            .first()
            .map(|entry| entry.command)
            .unwrap_or_default()
    }

    fn compute(&mut self, t: f64, _state: &VesselState, _target: Option<&Target>) -> ControlSignal {
        ControlSignal::Absolute(self.command_at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(t: f64, rpm: f64, rudder: f64) -> ScheduleEntry {
        ScheduleEntry {
            t,
            command: ControlInput::new(rpm, rudder),
        }
    }

    #[test]
    fn holds_each_command_until_the_next_breakpoint() {
        let schedule =
            ScheduledControl::new(vec![entry(10.0, 60.0, 0.1), entry(0.0, 30.0, 0.0), entry(20.0, 0.0, -0.2)])
                .unwrap();

        assert_eq!(schedule.command_at(-5.0), ControlInput::new(30.0, 0.0));
        assert_eq!(schedule.command_at(0.0), ControlInput::new(30.0, 0.0));
        assert_eq!(schedule.command_at(9.99), ControlInput::new(30.0, 0.0));
        assert_eq!(schedule.command_at(10.0), ControlInput::new(60.0, 0.1));
        assert_eq!(schedule.command_at(1.0e6), ControlInput::new(0.0, -0.2));
    }

    #[test]
    fn first_breakpoint_applies_before_it_starts() {
        let schedule = ScheduledControl::new(vec![entry(5.0, 40.0, 0.0)]).unwrap();

        assert_eq!(schedule.current(), ControlInput::new(40.0, 0.0));
        assert_eq!(schedule.command_at(0.0), ControlInput::new(40.0, 0.0));
    }

    #[test]
    fn empty_schedule_commands_nothing() {
        let mut schedule = ScheduledControl::default();

        assert_eq!(
            schedule.compute(3.0, &VesselState::default(), None),
            ControlSignal::Absolute(ControlInput::default())
        );
    }

    #[test]
    fn rejects_bad_times() {
        let duplicate = ScheduledControl::new(vec![entry(1.0, 0.0, 0.0), entry(1.0, 10.0, 0.0)]);
        assert!(matches!(
            duplicate,
            Err(ConfigError::ScheduleTime { index: 1, .. })
        ));

        let nan = ScheduledControl::new(vec![entry(0.0, 0.0, 0.0), entry(f64::NAN, 0.0, 0.0)]);
        assert!(matches!(nan, Err(ConfigError::ScheduleTime { index: 1, .. })));
    }

    #[test]
    fn entries_deserialize_with_thruster_commands() {
        let json = r#"[
            { "t": 0.0, "rpm": 30.0, "rudder_angle": 0.0 },
            { "t": 60.0, "rpm": 0.0, "rudder_angle": 0.0,
              "bow_thruster": { "force": 5.0e4, "angle": 1.5707963267948966 } }
        ]"#;

        let entries: Vec<ScheduleEntry> = serde_json::from_str(json).unwrap();
        let schedule = ScheduledControl::new(entries).unwrap();

        let command = schedule.command_at(90.0);
        assert_eq!(command.rpm, 0.0);
        assert!(command.bow_thruster.is_some());
    }
}
