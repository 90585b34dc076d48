use std::{fs, path::Path};

use anyhow::{Context, Result};
use keel_core::VesselParams;
use serde::Deserialize;

use crate::units::UnitsPolicy;

/// A ship definition: vessel parameters plus an optional units policy.
///
/// Only the rudder limits are affected by the angle unit; coefficient tables
/// are always given in internal units.
#[derive(Debug, Clone, Deserialize)]
pub struct ShipDocument {
    #[serde(default)]
    pub units_policy: UnitsPolicy,
    #[serde(flatten)]
    pub params: VesselParams,
}

impl ShipDocument {
    /// Vessel parameters in SI units and radians.
    #[must_use]
    pub fn into_params(self) -> VesselParams {
        let policy = self.units_policy;
        VesselParams {
            rudder_min: policy.angle(self.params.rudder_min),
            rudder_max: policy.angle(self.params.rudder_max),
            ..self.params
        }
    }
}

/// Reads and normalizes a ship definition.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid ship document.
pub fn load(path: &Path) -> Result<VesselParams> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading ship {}", path.display()))?;
    let document: ShipDocument = serde_json::from_str(&text)
        .with_context(|| format!("parsing ship {}", path.display()))?;
    let mut params = document.into_params();
    if params.name.is_none() {
        params.name = path.file_stem().map(|stem| stem.to_string_lossy().into_owned());
    }
    Ok(params)
}
