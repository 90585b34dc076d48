use std::ops::{Add, AddAssign};

use serde::{Deserialize, Serialize};

/// Body-fixed surge force, sway force, and yaw moment.
///
/// Units: `x` and `y` in N, `n` in N·m.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ForceTriplet {
    pub x: f64,
    pub y: f64,
    pub n: f64,
}

impl ForceTriplet {
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        n: 0.0,
    };

    #[must_use]
    pub fn new(x: f64, y: f64, n: f64) -> Self {
        Self { x, y, n }
    }

    /// Magnitude of the in-plane force.
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Returns `self` with every component multiplied by `factor`.
    #[must_use]
    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            n: self.n * factor,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.n.is_finite()
    }
}

impl Add for ForceTriplet {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            n: self.n + rhs.n,
        }
    }
}

impl AddAssign for ForceTriplet {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// One force module's contribution, by module name.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ModuleForce {
    pub name: &'static str,
    pub force: ForceTriplet,
}

/// Aggregated forces with the per-module breakdown.
///
/// Components are kept in summation order, so `total` is exactly the
/// left-to-right sum of `components`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ForceResult {
    pub total: ForceTriplet,
    pub components: Vec<ModuleForce>,
}

impl ForceResult {
    /// Returns the contribution of the named module, if it was registered.
    #[must_use]
    pub fn component(&self, name: &str) -> Option<ForceTriplet> {
        self.components
            .iter()
            .find(|module| module.name == name)
            .map(|module| module.force)
    }
}
