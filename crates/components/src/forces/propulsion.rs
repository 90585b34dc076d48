use keel_core::{ControlInput, ForceTriplet, PropulsionCoefficients, VesselState};

/// Propeller speeds at or below this magnitude produce no thrust [RPM].
const IDLE_RPM: f64 = 1.0e-6;

/// Open-water efficiency at advance ratio `j`.
///
/// Rises linearly from `bollard_efficiency * efficiency_max` at `j = 0` to
/// `efficiency_max` at the design advance ratio, then falls off by half of
/// `efficiency_max` per unit of advance ratio. Never negative.
#[must_use]
pub fn propeller_efficiency(j: f64, coefficients: &PropulsionCoefficients) -> f64 {
    let PropulsionCoefficients {
        efficiency_max,
        design_advance_ratio: j_opt,
        bollard_efficiency,
        ..
    } = *coefficients;

    let efficiency = if j <= j_opt {
        if j_opt > 0.0 {
            let floor = bollard_efficiency * efficiency_max;
            floor + (efficiency_max - floor) * (j / j_opt)
        } else {
            0.0
        }
    } else {
        efficiency_max * (1.0 - 0.5 * (j - j_opt)).max(0.0)
    };
    efficiency.max(0.0)
}

/// Main propeller thrust with a rudder-steering side force.
///
/// Thrust follows the polynomial map `t0 + t1 rpm + t2 rpm|rpm|`, scaled by
/// the efficiency at the current advance ratio and by `1 - thrust_deduction`.
/// The side force `steer_gain * X * rudder_angle` acts at `x_prop`.
#[must_use]
pub fn propulsion_force(
    state: &VesselState,
    control: &ControlInput,
    coefficients: &PropulsionCoefficients,
    lpp: f64,
) -> ForceTriplet {
    let rpm = control.rpm;

    let efficiency = if rpm.abs() > IDLE_RPM {
        let revs_per_second = rpm.abs() / 60.0;
        let advance_speed = state.u * (1.0 - coefficients.wake_fraction);
        let diameter = coefficients.diameter(lpp);
        let denominator = revs_per_second * diameter;
        let j = if denominator > IDLE_RPM {
            advance_speed / denominator
        } else {
            0.0
        };
        propeller_efficiency(j, coefficients)
    } else {
        0.0
    };

    let thrust_base = coefficients.t0 + coefficients.t1 * rpm + coefficients.t2 * rpm * rpm.abs();
    let x = thrust_base * efficiency * (1.0 - coefficients.thrust_deduction);
    let y = coefficients.steer_gain * x * control.rudder_angle;
    let n = -y * coefficients.x_prop(lpp);

    ForceTriplet::new(x, y, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    const LPP: f64 = 100.0;

    #[test]
    fn efficiency_curve_peaks_at_the_design_point() {
        let coefficients = PropulsionCoefficients::default();

        assert_relative_eq!(propeller_efficiency(0.0, &coefficients), 0.21, max_relative = 1e-12);
        assert_relative_eq!(propeller_efficiency(0.7, &coefficients), 0.7, max_relative = 1e-12);
        assert_relative_eq!(propeller_efficiency(1.7, &coefficients), 0.35, max_relative = 1e-12);
        assert_relative_eq!(propeller_efficiency(5.0, &coefficients), 0.0);
        assert!(propeller_efficiency(0.35, &coefficients) < 0.7);
    }

    #[test]
    fn bollard_thrust_at_rest() {
        let control = ControlInput::new(50.0, 0.0);

        let force = propulsion_force(
            &VesselState::default(),
            &control,
            &PropulsionCoefficients::default(),
            LPP,
        );

        // 50 * 50^2 * 0.21 * 0.8
        assert_relative_eq!(force.x, 21_000.0, max_relative = 1e-12);
        assert_relative_eq!(force.y, 0.0);
        assert_relative_eq!(force.n, 0.0);
    }

    #[test]
    fn zero_rpm_gives_zero_force() {
        let state = VesselState {
            u: 3.0,
            ..VesselState::default()
        };

        let force = propulsion_force(
            &state,
            &ControlInput::new(0.0, 0.3),
            &PropulsionCoefficients::default(),
            LPP,
        );

        assert_eq!(force, ForceTriplet::ZERO);
    }

    #[test]
    fn reverse_rpm_pulls_astern() {
        let force = propulsion_force(
            &VesselState::default(),
            &ControlInput::new(-60.0, 0.0),
            &PropulsionCoefficients::default(),
            LPP,
        );

        assert!(force.x < 0.0);
    }

    #[test]
    fn rudder_steers_the_thrust() {
        let rudder = 0.2;
        let coefficients = PropulsionCoefficients::default();

        let force = propulsion_force(
            &VesselState::default(),
            &ControlInput::new(80.0, rudder),
            &coefficients,
            LPP,
        );

        assert_relative_eq!(force.y, 0.01 * force.x * rudder);
        // the propeller sits aft, so a port side force turns the bow to port
        assert_relative_eq!(force.n, force.y * 50.0);
        assert!(force.n > 0.0);
    }
}
