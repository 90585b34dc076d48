use serde::{Deserialize, Serialize};

use crate::StepIntegrable;

/// Number of integrated state components: `x, y, psi, u, v, r`.
pub const STATE_DIM: usize = 6;

/// The packed state vector handed to ODE solvers.
///
/// Ordering is `[x, y, psi, u, v, r]`. Time is carried separately by the solver.
pub type StateVector = [f64; STATE_DIM];

/// Planar vessel state in SI units and radians.
///
/// Positions are in a local east-north frame; `psi` is measured counter-clockwise
/// from `+x`. Velocities are body-fixed: `u` along the bow, `v` to port, `r` yaw rate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VesselState {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub psi: f64,
    pub u: f64,
    pub v: f64,
    pub r: f64,
}

impl VesselState {
    /// Creates a state at rest at the given pose.
    #[must_use]
    pub fn at_rest(t: f64, x: f64, y: f64, psi: f64) -> Self {
        Self {
            t,
            x,
            y,
            psi,
            ..Self::default()
        }
    }

    /// Packs the integrated components into a solver vector.
    #[must_use]
    pub fn pack(&self) -> StateVector {
        [self.x, self.y, self.psi, self.u, self.v, self.r]
    }

    /// Rebuilds a state from a solver vector at time `t`.
    ///
    /// This is the exact inverse of [`VesselState::pack`].
    #[must_use]
    pub fn unpack(t: f64, y: &StateVector) -> Self {
        let [x, y_pos, psi, u, v, r] = *y;
        Self {
            t,
            x,
            y: y_pos,
            psi,
            u,
            v,
            r,
        }
    }

    /// Returns `self` at a different time, keeping all other fields.
    #[must_use]
    pub fn with_time(self, t: f64) -> Self {
        Self { t, ..self }
    }

    /// Speed over ground from body velocities.
    #[must_use]
    pub fn speed(&self) -> f64 {
        self.u.hypot(self.v)
    }

    /// Named components in a fixed order, for finiteness checks and logging.
    #[must_use]
    pub fn components(&self) -> [(&'static str, f64); 7] {
        [
            ("t", self.t),
            ("x", self.x),
            ("y", self.y),
            ("psi", self.psi),
            ("u", self.u),
            ("v", self.v),
            ("r", self.r),
        ]
    }
}

/// Time derivatives of the six integrated state components.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Derivatives {
    pub dx: f64,
    pub dy: f64,
    pub dpsi: f64,
    pub du: f64,
    pub dv: f64,
    pub dr: f64,
}

impl Derivatives {
    /// Packs derivatives in the same order as [`VesselState::pack`].
    #[must_use]
    pub fn pack(&self) -> StateVector {
        [self.dx, self.dy, self.dpsi, self.du, self.dv, self.dr]
    }

    /// Named components in a fixed order.
    #[must_use]
    pub fn components(&self) -> [(&'static str, f64); 6] {
        [
            ("dx", self.dx),
            ("dy", self.dy),
            ("dpsi", self.dpsi),
            ("du", self.du),
            ("dv", self.dv),
            ("dr", self.dr),
        ]
    }
}

impl StepIntegrable<f64> for VesselState {
    type Derivative = Derivatives;

    fn step(&self, derivative: Derivatives, delta: f64) -> Self {
        Self {
            t: self.t + delta,
            x: self.x + derivative.dx * delta,
            y: self.y + derivative.dy * delta,
            psi: self.psi + derivative.dpsi * delta,
            u: self.u + derivative.du * delta,
            v: self.v + derivative.dv * delta,
            r: self.r + derivative.dr * delta,
        }
    }
}
