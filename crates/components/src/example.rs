//! A reference vessel for tests, demos, and documentation.

use keel_core::{SEAWATER_DENSITY, VesselParams};

/// A 100 m coastal cargo vessel with default coefficient tables.
///
/// Principal dimensions are `lpp = 100`, `beam = 16`, `draft = 6` (m), with
/// propeller speed limited to ±120 RPM and rudder to ±0.61 rad (about 35°).
#[must_use]
pub fn coastal_vessel() -> VesselParams {
    VesselParams {
        mass: 5.0e6,
        yaw_inertia: 3.125e9,
        x_u_dot: -2.5e5,
        y_v_dot: -2.5e6,
        n_r_dot: -1.0e9,
        lpp: 100.0,
        beam: 16.0,
        draft: 6.0,
        rho_water: SEAWATER_DENSITY,
        rpm_min: -120.0,
        rpm_max: 120.0,
        rudder_min: -0.61,
        rudder_max: 0.61,
        hull: Default::default(),
        propulsion: Default::default(),
        rudder: Default::default(),
        wind: Default::default(),
        current: Default::default(),
        thrusters: Default::default(),
        name: Some("coastal cargo".to_owned()),
    }
}
