use keel_core::{ControlInput, EnvironmentSample, ForceResult, Record, VesselState};

/// Below this magnitude force and drift angles are reported as zero.
const ANGLE_THRESHOLD: f64 = 1.0e-6;

/// The actuator accumulators at the time of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Commands {
    pub rpm: f64,
    pub rudder: f64,
}

/// Builds the flattened tick record.
///
/// Key order: state, applied control, environment, total forces, actuator
/// accumulators, per-module forces in summation order, then derived
/// diagnostics.
pub(crate) fn tick_record(
    state: &VesselState,
    control: &ControlInput,
    env: &EnvironmentSample,
    forces: &ForceResult,
    commands: Commands,
) -> Record {
    let mut record = Record::with_capacity(22 + 3 * forces.components.len());

    for (key, value) in state.components() {
        record.insert(key, value);
    }
    record.insert("rpm", control.rpm);
    record.insert("rudder_angle", control.rudder_angle);
    record.insert("wind_speed", env.wind_speed);
    record.insert("wind_dir_from", env.wind_dir_from);
    record.insert("current_speed", env.current_speed);
    record.insert("current_dir_to", env.current_dir_to);
    record.insert("X", forces.total.x);
    record.insert("Y", forces.total.y);
    record.insert("N", forces.total.n);
    record.insert("rpm_cmd", commands.rpm);
    record.insert("rudder_cmd", commands.rudder);

    for module in &forces.components {
        record.insert(format!("{}_X", module.name), module.force.x);
        record.insert(format!("{}_Y", module.name), module.force.y);
        record.insert(format!("{}_N", module.name), module.force.n);
    }

    let magnitude = forces.total.magnitude();
    let force_angle = if magnitude > ANGLE_THRESHOLD {
        forces.total.y.atan2(forces.total.x)
    } else {
        0.0
    };
    let speed = state.speed();
    let drift_angle = if speed > ANGLE_THRESHOLD {
        state.v.atan2(state.u)
    } else {
        0.0
    };
    record.insert("force_magnitude", magnitude);
    record.insert("force_angle_rad", force_angle);
    record.insert("speed", speed);
    record.insert("drift_angle", drift_angle);

    record
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::f64::consts::FRAC_PI_4;

    use approx::assert_relative_eq;
    use keel_core::{ForceTriplet, ModuleForce};

    fn forces() -> ForceResult {
        let hull = ForceTriplet::new(-100.0, 0.0, 0.0);
        let propulsion = ForceTriplet::new(1100.0, 1000.0, -50.0);
        ForceResult {
            total: hull + propulsion,
            components: vec![
                ModuleForce {
                    name: "hull",
                    force: hull,
                },
                ModuleForce {
                    name: "propulsion",
                    force: propulsion,
                },
            ],
        }
    }

    #[test]
    fn keys_follow_the_documented_order() {
        let record = tick_record(
            &VesselState::default(),
            &ControlInput::new(50.0, 0.1),
            &EnvironmentSample::calm(),
            &forces(),
            Commands {
                rpm: 50.0,
                rudder: 0.1,
            },
        );

        let keys: Vec<_> = record.keys().collect();
        assert_eq!(
            keys,
            vec![
                "t", "x", "y", "psi", "u", "v", "r", "rpm", "rudder_angle", "wind_speed",
                "wind_dir_from", "current_speed", "current_dir_to", "X", "Y", "N", "rpm_cmd",
                "rudder_cmd", "hull_X", "hull_Y", "hull_N", "propulsion_X", "propulsion_Y",
                "propulsion_N", "force_magnitude", "force_angle_rad", "speed", "drift_angle",
            ]
        );
    }

    #[test]
    fn derived_diagnostics() {
        let state = VesselState {
            u: 2.0,
            v: 2.0,
            ..VesselState::default()
        };

        let record = tick_record(
            &state,
            &ControlInput::default(),
            &EnvironmentSample::calm(),
            &forces(),
            Commands {
                rpm: 0.0,
                rudder: 0.0,
            },
        );

        assert_relative_eq!(record.get("X"), 1000.0);
        assert_relative_eq!(record.get("force_angle_rad"), FRAC_PI_4);
        assert_relative_eq!(record.get("force_magnitude"), 1000.0 * 2.0_f64.sqrt(), max_relative = 1e-12);
        assert_relative_eq!(record.get("drift_angle"), FRAC_PI_4);
        assert_relative_eq!(record.get("speed"), 8.0_f64.sqrt(), max_relative = 1e-12);
    }

    #[test]
    fn angles_are_zero_at_rest() {
        let record = tick_record(
            &VesselState::default(),
            &ControlInput::default(),
            &EnvironmentSample::calm(),
            &ForceResult::default(),
            Commands {
                rpm: 0.0,
                rudder: 0.0,
            },
        );

        assert_eq!(record.get("force_angle_rad"), 0.0);
        assert_eq!(record.get("drift_angle"), 0.0);
    }
}
