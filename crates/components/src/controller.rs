//! Control layer: PID rate autopilot, the rate-to-absolute actuator
//! integrator, and the control providers a run can be driven by.

mod actuator;
mod autopilot;
mod pid;
mod provider;
mod schedule;

pub use actuator::ActuatorIntegrator;
pub use autopilot::RateAutopilot;
pub use pid::{PidAxis, wrap_angle};
pub use provider::{AutopilotProvider, FixedCommand, FixedTarget, TargetProvider};
pub use schedule::{ScheduleEntry, ScheduledControl};
