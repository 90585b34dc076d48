//! Output sinks and reusable observers for Keel simulation runs.
//!
//! This crate provides [`Observer`] implementations that plug into the
//! simulation loop, plus the capability traits they are written against.
//!
//! # Modules
//!
//! - [`traits`]: capability traits for events and actions ([`HasRecord`],
//!   [`HasRunResult`], [`CanAbort`])
//! - [`sink`]: tick sinks ([`CsvSink`], [`JsonlSink`]) and the summary writer
//!   ([`JsonSummaryWriter`])
//!
//! [`Recorder`] fans tick records out to sinks and writes the summary when the
//! run ends. [`TraceObserver`] logs progress through `tracing`.
//!
//! [`Observer`]: keel_core::Observer
//! [`HasRecord`]: traits::HasRecord
//! [`HasRunResult`]: traits::HasRunResult
//! [`CanAbort`]: traits::CanAbort

mod recorder;
mod trace;

pub mod sink;
pub mod traits;

pub use recorder::Recorder;
pub use sink::{CsvSink, JsonSummaryWriter, JsonlSink, SummarySink, TickSink};
pub use trace::TraceObserver;
