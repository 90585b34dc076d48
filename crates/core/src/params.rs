//! Static vessel description and per-module coefficient tables.
//!
//! Every coefficient table deserializes with `#[serde(default)]`, so a ship
//! document only needs to list the coefficients it overrides. Coefficients
//! whose default scales with the hull's principal dimensions are stored as
//! `Option<f64>` and resolved against [`VesselParams`] on use.

use serde::{Deserialize, Serialize};

/// Nominal seawater density [kg/m³].
pub const SEAWATER_DENSITY: f64 = 1025.0;

/// Physical description of a vessel, fixed for the duration of a run.
///
/// Added-mass derivatives follow the usual sign convention and are negative
/// for a real hull, which increases the effective mass in the equations of
/// motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselParams {
    /// Displacement mass [kg].
    pub mass: f64,
    /// Yaw moment of inertia about the centre of gravity [kg·m²].
    pub yaw_inertia: f64,
    /// Surge added-mass derivative [kg].
    pub x_u_dot: f64,
    /// Sway added-mass derivative [kg].
    pub y_v_dot: f64,
    /// Yaw added-inertia derivative [kg·m²].
    pub n_r_dot: f64,
    /// Length between perpendiculars [m].
    pub lpp: f64,
    /// Beam [m].
    pub beam: f64,
    /// Draft [m].
    pub draft: f64,
    /// Water density [kg/m³].
    #[serde(default = "default_rho_water")]
    pub rho_water: f64,
    pub rpm_min: f64,
    pub rpm_max: f64,
    /// Lower rudder limit [rad].
    pub rudder_min: f64,
    /// Upper rudder limit [rad].
    pub rudder_max: f64,
    #[serde(default)]
    pub hull: HullCoefficients,
    #[serde(default)]
    pub propulsion: PropulsionCoefficients,
    #[serde(default)]
    pub rudder: RudderCoefficients,
    #[serde(default)]
    pub wind: WindCoefficients,
    #[serde(default)]
    pub current: CurrentCoefficients,
    #[serde(default)]
    pub thrusters: ThrusterTable,
    /// Free-form vessel name, carried into run summaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_rho_water() -> f64 {
    SEAWATER_DENSITY
}

impl VesselParams {
    /// Clamps an RPM command into the actuator range.
    #[must_use]
    pub fn clamp_rpm(&self, rpm: f64) -> f64 {
        rpm.max(self.rpm_min).min(self.rpm_max)
    }

    /// Clamps a rudder command into the actuator range.
    #[must_use]
    pub fn clamp_rudder(&self, rudder: f64) -> f64 {
        rudder.max(self.rudder_min).min(self.rudder_max)
    }
}

/// MMG-style hull damping and cross-coupling derivatives.
///
/// Naming follows the force axis then the motion terms, so `yur` multiplies
/// `u * r` in the sway force.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HullCoefficients {
    pub xu: f64,
    pub xuu: f64,
    pub xvr: f64,
    pub xvv: f64,
    pub xrr: f64,
    pub yv: f64,
    pub yvv: f64,
    pub yuv: f64,
    pub yur: f64,
    pub yvr: f64,
    pub nr: f64,
    pub nrr: f64,
    pub nuv: f64,
    pub nur: f64,
    pub nvv: f64,
}

impl Default for HullCoefficients {
    fn default() -> Self {
        Self {
            xu: -5.0e4,
            xuu: -5.0e3,
            xvr: -2.0e5,
            xvv: -1.0e4,
            xrr: -1.0e6,
            yv: -1.0e6,
            yvv: -5.0e4,
            yuv: -2.0e5,
            yur: 1.0e6,
            yvr: -5.0e5,
            nr: -1.0e8,
            nrr: -5.0e6,
            nuv: -5.0e7,
            nur: -2.0e8,
            nvv: -1.0e7,
        }
    }
}

/// Propeller thrust map and efficiency curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropulsionCoefficients {
    /// Constant term of the thrust map [N].
    pub t0: f64,
    /// Linear term of the thrust map [N/RPM].
    pub t1: f64,
    /// Quadratic term of the thrust map [N/RPM²].
    pub t2: f64,
    /// Lateral force per unit thrust and rudder angle [1/rad].
    pub steer_gain: f64,
    /// Longitudinal propeller position [m]. Defaults to `-0.5 * lpp`.
    pub x_prop: Option<f64>,
    /// Propeller diameter [m]. Defaults to `0.1 * lpp`.
    pub diameter: Option<f64>,
    pub wake_fraction: f64,
    pub thrust_deduction: f64,
    pub efficiency_max: f64,
    /// Advance ratio of peak efficiency.
    pub design_advance_ratio: f64,
    /// Efficiency at zero advance ratio, as a fraction of `efficiency_max`.
    pub bollard_efficiency: f64,
}

impl Default for PropulsionCoefficients {
    fn default() -> Self {
        Self {
            t0: 0.0,
            t1: 0.0,
            t2: 50.0,
            steer_gain: 0.01,
            x_prop: None,
            diameter: None,
            wake_fraction: 0.3,
            thrust_deduction: 0.2,
            efficiency_max: 0.7,
            design_advance_ratio: 0.7,
            bollard_efficiency: 0.3,
        }
    }
}

impl PropulsionCoefficients {
    #[must_use]
    pub fn x_prop(&self, lpp: f64) -> f64 {
        self.x_prop.unwrap_or(-0.5 * lpp)
    }

    #[must_use]
    pub fn diameter(&self, lpp: f64) -> f64 {
        self.diameter.unwrap_or(0.1 * lpp)
    }
}

/// Rudder geometry and lift/drag characteristics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RudderCoefficients {
    /// Planform area [m²]. Defaults to `max(1, 0.02 * lpp * draft)`.
    pub area: Option<f64>,
    /// Lift curve slope [1/rad].
    pub lift_slope: f64,
    pub drag_coefficient: f64,
    /// Longitudinal rudder position [m]. Defaults to `-0.45 * lpp`.
    pub x_rudder: Option<f64>,
    /// Stall angle [rad].
    pub stall_angle: f64,
    pub slipstream_factor: f64,
    pub aspect_ratio: f64,
    /// Propeller speed at which the slipstream boost saturates [RPM].
    pub slipstream_saturation_rpm: f64,
}

impl Default for RudderCoefficients {
    fn default() -> Self {
        Self {
            area: None,
            lift_slope: 6.28,
            drag_coefficient: 0.08,
            x_rudder: None,
            stall_angle: 0.35,
            slipstream_factor: 1.5,
            aspect_ratio: 2.0,
            slipstream_saturation_rpm: 50.0,
        }
    }
}

impl RudderCoefficients {
    #[must_use]
    pub fn area(&self, lpp: f64, draft: f64) -> f64 {
        self.area.unwrap_or_else(|| (0.02 * lpp * draft).max(1.0))
    }

    #[must_use]
    pub fn x_rudder(&self, lpp: f64) -> f64 {
        self.x_rudder.unwrap_or(-0.45 * lpp)
    }
}

/// Aerodynamic drag coefficients for the above-water hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindCoefficients {
    pub cx: f64,
    pub cy: f64,
    /// Reference area [m²]. Defaults to `beam * draft`.
    pub area: Option<f64>,
    /// Yaw lever arm as a fraction of `lpp`.
    pub lever: f64,
    /// Air density [kg/m³].
    pub air_density: f64,
}

impl Default for WindCoefficients {
    fn default() -> Self {
        Self {
            cx: 0.8,
            cy: 1.0,
            area: None,
            lever: 0.5,
            air_density: 1.225,
        }
    }
}

impl WindCoefficients {
    #[must_use]
    pub fn area(&self, beam: f64, draft: f64) -> f64 {
        self.area.unwrap_or(beam * draft)
    }
}

/// Linear and quadratic drag against the relative water flow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurrentCoefficients {
    pub kx_linear: f64,
    pub ky_linear: f64,
    pub kx_quad: f64,
    pub ky_quad: f64,
    /// Yaw lever arm as a fraction of `lpp`.
    pub lever: f64,
    /// Whether shallow water increases drag.
    pub depth_effect: bool,
    /// Depth-to-draft ratio below which the shallow-water factor applies.
    pub min_depth_ratio: f64,
}

impl Default for CurrentCoefficients {
    fn default() -> Self {
        Self {
            kx_linear: 5.0e4,
            ky_linear: 1.0e5,
            kx_quad: 2.0e3,
            ky_quad: 5.0e3,
            lever: 0.5,
            depth_effect: true,
            min_depth_ratio: 1.2,
        }
    }
}

/// Where a thruster is mounted. Selects its default coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrusterMount {
    Bow,
    Stern,
}

impl ThrusterMount {
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bow => "bow_thruster",
            Self::Stern => "stern_thruster",
        }
    }
}

/// Thruster capability table. Absent entries take the mount's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrusterCoefficients {
    /// Maximum deliverable force [N].
    pub max_force: Option<f64>,
    pub efficiency: Option<f64>,
    /// Longitudinal position from the centre of gravity [m].
    pub position_x: Option<f64>,
    pub power_curve_exponent: Option<f64>,
}

impl ThrusterCoefficients {
    #[must_use]
    pub fn max_force(&self, mount: ThrusterMount) -> f64 {
        self.max_force.unwrap_or(match mount {
            ThrusterMount::Bow => 1.5e5,
            ThrusterMount::Stern => 1.0e5,
        })
    }

    #[must_use]
    pub fn efficiency(&self, mount: ThrusterMount) -> f64 {
        self.efficiency.unwrap_or(match mount {
            ThrusterMount::Bow => 0.85,
            ThrusterMount::Stern => 0.80,
        })
    }

    #[must_use]
    pub fn position_x(&self, mount: ThrusterMount, lpp: f64) -> f64 {
        self.position_x.unwrap_or(match mount {
            ThrusterMount::Bow => 0.4 * lpp,
            ThrusterMount::Stern => -0.4 * lpp,
        })
    }

    #[must_use]
    pub fn power_curve_exponent(&self) -> f64 {
        self.power_curve_exponent.unwrap_or(1.5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrusterTable {
    pub bow: ThrusterCoefficients,
    pub stern: ThrusterCoefficients,
}

impl ThrusterTable {
    #[must_use]
    pub fn get(&self, mount: ThrusterMount) -> &ThrusterCoefficients {
        match mount {
            ThrusterMount::Bow => &self.bow,
            ThrusterMount::Stern => &self.stern,
        }
    }
}
