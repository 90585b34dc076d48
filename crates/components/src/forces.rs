//! The closed set of force contributors acting on the hull.
//!
//! Each module is a pure function of state, control, environment, and vessel
//! parameters. None of them fail for finite input: out-of-range commands are
//! clamped and degenerate flows produce zero force.

mod current;
mod hull;
mod propulsion;
mod rudder;
mod thruster;
mod wind;

pub use current::{current_force, depth_factor};
pub use hull::hull_force;
pub use propulsion::{propeller_efficiency, propulsion_force};
pub use rudder::{drag_coefficient, lift_coefficient, rudder_force};
pub use thruster::thruster_force;
pub use wind::{body_to_world_velocity, wind_force, world_to_body};

use keel_core::{
    ControlInput, EnvironmentSample, ForceTriplet, ThrusterMount, VesselParams, VesselState,
};

/// One physical force contributor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForceModule {
    Hull,
    Propulsion,
    Rudder,
    Wind,
    Current,
    BowThruster,
    SternThruster,
}

impl ForceModule {
    /// Every module, in the standard summation order.
    pub const ALL: [Self; 7] = [
        Self::Hull,
        Self::Propulsion,
        Self::Rudder,
        Self::Wind,
        Self::Current,
        Self::BowThruster,
        Self::SternThruster,
    ];

    /// The module's name, used as the prefix of its tick record columns.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hull => "hull",
            Self::Propulsion => "propulsion",
            Self::Rudder => "rudder",
            Self::Wind => "wind",
            Self::Current => "current",
            Self::BowThruster => ThrusterMount::Bow.name(),
            Self::SternThruster => ThrusterMount::Stern.name(),
        }
    }

    /// Computes this module's surge force, sway force, and yaw moment.
    #[must_use]
    pub fn compute(
        self,
        state: &VesselState,
        control: &ControlInput,
        env: &EnvironmentSample,
        params: &VesselParams,
    ) -> ForceTriplet {
        match self {
            Self::Hull => hull_force(state, &params.hull),
            Self::Propulsion => propulsion_force(state, control, &params.propulsion, params.lpp),
            Self::Rudder => rudder_force(
                state,
                control,
                &params.rudder,
                params.rho_water,
                params.lpp,
                params.draft,
            ),
            Self::Wind => wind_force(
                state,
                env,
                &params.wind,
                params.lpp,
                params.beam,
                params.draft,
            ),
            Self::Current => current_force(state, env, &params.current, params.lpp, params.draft),
            Self::BowThruster => thrust(ThrusterMount::Bow, control, env, params),
            Self::SternThruster => thrust(ThrusterMount::Stern, control, env, params),
        }
    }
}

fn thrust(
    mount: ThrusterMount,
    control: &ControlInput,
    env: &EnvironmentSample,
    params: &VesselParams,
) -> ForceTriplet {
    thruster_force(mount, control, env, params.thrusters.get(mount), params.lpp)
}
