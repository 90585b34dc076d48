//! Physical and control components for the Keel maneuvering simulator.
//!
//! The force modules in [`forces`] are summed by a [`ForceAggregator`] and
//! turned into state derivatives by the [`DynamicsModel`]. The [`controller`]
//! module supplies actuator commands and the [`environment`] module supplies
//! wind and current.

mod aggregate;
mod dynamics;

pub mod controller;
pub mod environment;
pub mod example;
pub mod forces;

pub use aggregate::ForceAggregator;
pub use dynamics::DynamicsModel;
pub use forces::ForceModule;
