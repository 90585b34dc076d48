use keel_core::{
    ControlInput, EnvironmentSample, ForceTriplet, ThrusterCoefficients, ThrusterMount,
};

/// Force from a tunnel or azimuth thruster at the bow or stern.
///
/// The commanded magnitude is clamped to the thruster's maximum and derated by
/// a power-curve penalty that grows with utilisation. Currents above 1 m/s
/// derate it further, as does main propeller wash for a stern thruster. An
/// absent command produces no force.
#[must_use]
pub fn thruster_force(
    mount: ThrusterMount,
    control: &ControlInput,
    env: &EnvironmentSample,
    coefficients: &ThrusterCoefficients,
    lpp: f64,
) -> ForceTriplet {
    let command = match mount {
        ThrusterMount::Bow => control.bow_thruster,
        ThrusterMount::Stern => control.stern_thruster,
    };
    let Some(command) = command else {
        return ForceTriplet::ZERO;
    };

    let max_force = coefficients.max_force(mount);
    let magnitude = command.force.abs().min(max_force);
    let utilisation = if max_force > 0.0 {
        magnitude / max_force
    } else {
        0.0
    };
    let power_penalty = utilisation.powf(coefficients.power_curve_exponent());
    let effective =
        magnitude * coefficients.efficiency(mount) * (1.0 - 0.2 * power_penalty) * command.force.signum();

    let mut derating = 1.0;
    if env.current_speed > 1.0 {
        derating *= (1.0 - 0.1 * (env.current_speed - 1.0)).max(0.7);
    }
    if mount == ThrusterMount::Stern && control.rpm.abs() > 10.0 {
        derating *= (1.0 - 0.002 * control.rpm.abs()).max(0.8);
    }

    let (sin, cos) = command.angle.sin_cos();
    let x = effective * cos * derating;
    let y = effective * sin * derating;
    let n = -y * coefficients.position_x(mount, lpp);

    ForceTriplet::new(x, y, n)
}
