//! Unit policies declared by input documents.
//!
//! Everything past the loaders works in SI units and radians. Documents may
//! give angles in degrees and speeds in knots; the loaders convert on read.

use serde::Deserialize;
use uom::si::{
    angle::{degree, radian},
    angular_velocity::{degree_per_second, radian_per_second},
    f64::{Angle, AngularVelocity, Velocity},
    velocity::{knot, meter_per_second},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Rad,
    Deg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedUnit {
    #[default]
    #[serde(alias = "m/s")]
    MetersPerSecond,
    #[serde(alias = "kn")]
    Knots,
}

/// The `units_policy` block of a ship or scenario document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct UnitsPolicy {
    pub angles: AngleUnit,
    pub speeds: SpeedUnit,
}

impl UnitsPolicy {
    /// Converts an angle to radians.
    #[must_use]
    pub fn angle(self, value: f64) -> f64 {
        match self.angles {
            AngleUnit::Rad => value,
            AngleUnit::Deg => Angle::new::<degree>(value).get::<radian>(),
        }
    }

    /// Converts a turn rate to radians per second.
    #[must_use]
    pub fn turn_rate(self, value: f64) -> f64 {
        match self.angles {
            AngleUnit::Rad => value,
            AngleUnit::Deg => {
                AngularVelocity::new::<degree_per_second>(value).get::<radian_per_second>()
            }
        }
    }

    /// Converts a speed to metres per second.
    #[must_use]
    pub fn speed(self, value: f64) -> f64 {
        match self.speeds {
            SpeedUnit::MetersPerSecond => value,
            SpeedUnit::Knots => Velocity::new::<knot>(value).get::<meter_per_second>(),
        }
    }
}
