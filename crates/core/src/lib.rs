//! Core types and traits for the Keel vessel maneuvering simulator.
//!
//! This crate defines the shared vocabulary the force models, the control
//! layer, and the simulation loop build on:
//!
//! - [`VesselState`], [`ControlInput`], [`EnvironmentSample`], [`ForceResult`],
//!   and [`Derivatives`] as plain value types
//! - [`VesselParams`] and [`SimulationConfig`] as the static inputs to a run,
//!   checked by the functions in [`validation`]
//! - [`ConfigError`], [`NumericalInstability`], and [`RuntimeAbort`] as the
//!   error taxonomy
//! - [`ControlProvider`], [`EnvironmentProvider`], and [`VesselModel`] as the
//!   loop's collaborator contracts, and [`Observer`] for watching a run
//! - [`Record`], the flattened per-step record handed to output sinks

mod config;
mod control;
mod environment;
mod error;
mod force;
mod observer;
mod params;
mod provider;
mod record;
mod state;
mod step;

pub mod validation;

pub use config::{
    AutopilotConfig, CurrentConfig, EnvironmentConfig, IntegrationMethod, PidGains, SafetyLimits,
    SimulationConfig, TerminationBounds, WindConfig,
};
pub use control::{ControlInput, ControlRate, ControlSignal, ThrusterCommand};
pub use environment::EnvironmentSample;
pub use error::{ConfigError, Error, NumericalInstability, RuntimeAbort};
pub use force::{ForceResult, ForceTriplet, ModuleForce};
pub use observer::Observer;
pub use params::{
    CurrentCoefficients, HullCoefficients, PropulsionCoefficients, RudderCoefficients,
    SEAWATER_DENSITY, ThrusterCoefficients, ThrusterMount, ThrusterTable, VesselParams,
    WindCoefficients,
};
pub use provider::{ControlProvider, EnvironmentProvider, Target, VesselModel};
pub use record::Record;
pub use state::{Derivatives, STATE_DIM, StateVector, VesselState};
pub use step::{DerivativeOf, StepIntegrable};
pub use validation::Bound;
