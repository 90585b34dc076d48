//! The `keel` command-line runner.
//!
//! Loads a ship and a scenario from JSON, normalizes units, selects the
//! control and environment providers the scenario asks for, runs the
//! simulation, and writes `results.csv`, `results.jsonl`, and `summary.json`.

mod args;
mod run;

pub mod scenario;
pub mod ship;
pub mod units;

pub use args::Args;
pub use run::{CSV_FILE, JSONL_FILE, SUMMARY_FILE, ScenarioControl, execute};
