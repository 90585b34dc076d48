use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Environmental conditions at one query time.
///
/// Wind direction is the direction the wind comes *from*; current direction is
/// the direction the water flows *to*. Both are in radians, counter-clockwise
/// from `+x`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EnvironmentSample {
    /// True wind speed [m/s].
    pub wind_speed: f64,
    /// Direction the wind comes from [rad].
    pub wind_dir_from: f64,
    /// Current speed [m/s].
    pub current_speed: f64,
    /// Direction the current flows to [rad].
    pub current_dir_to: f64,
    /// Sea state on the 0 to 9 scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sea_state: Option<u8>,
    /// Water depth [m], used by the shallow-water current model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<f64>,
    /// Named extension values.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, f64>,
}

impl EnvironmentSample {
    /// A calm sample: no wind, no current.
    #[must_use]
    pub fn calm() -> Self {
        Self::default()
    }

    /// Creates a sample with wind and current set and no optional fields.
    #[must_use]
    pub fn new(wind_speed: f64, wind_dir_from: f64, current_speed: f64, current_dir_to: f64) -> Self {
        Self {
            wind_speed,
            wind_dir_from,
            current_speed,
            current_dir_to,
            ..Self::default()
        }
    }

    /// Returns `self` with the given water depth.
    #[must_use]
    pub fn with_depth(self, depth: f64) -> Self {
        Self {
            depth: Some(depth),
            ..self
        }
    }
}
