//! Integration and the simulation loop for Keel.
//!
//! - [`ode`] integrates one frozen-input segment with explicit Euler, RK4,
//!   Dopri5, or Dop853.
//! - [`simulation`] runs the segmented loop, emitting events to an
//!   [`Observer`](keel_core::Observer) and reporting a
//!   [`RunResult`](simulation::RunResult).

pub mod ode;
pub mod simulation;
