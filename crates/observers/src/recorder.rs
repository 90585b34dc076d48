use std::io;

use keel_core::Observer;
use tracing::{error, warn};

use crate::{
    sink::{SummarySink, TickSink},
    traits::{CanAbort, HasRecord, HasRunResult},
};

/// Fans tick records out to any number of sinks and writes the summary when
/// the run finishes.
///
/// A failed tick write aborts the run, and the first I/O error is kept for
/// the caller. Sinks are flushed when the run finishes and again on drop.
///
/// # Example
///
/// ```ignore
/// let mut recorder = Recorder::new()
///     .with_sink(CsvSink::create("results.csv")?)
///     .with_summary(JsonSummaryWriter::create("summary.json")?);
///
/// let result = simulation::run(&model, &params, &config, initial, control, env, |event: &Event| {
///     recorder.observe(event)
/// })?;
/// if let Some(err) = recorder.take_error() { ... }
/// ```
#[derive(Default)]
pub struct Recorder {
    sinks: Vec<Box<dyn TickSink>>,
    summary: Option<Box<dyn SummarySink>>,
    error: Option<io::Error>,
    written: usize,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_sink(mut self, sink: impl TickSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    #[must_use]
    pub fn with_summary(mut self, sink: impl SummarySink + 'static) -> Self {
        self.summary = Some(Box::new(sink));
        self
    }

    /// Number of records handed to every sink.
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    /// The first I/O error encountered, if any.
    #[must_use]
    pub fn error(&self) -> Option<&io::Error> {
        self.error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<io::Error> {
        self.error.take()
    }

    fn flush_all(&mut self) -> io::Result<()> {
        let mut first = Ok(());
        for sink in &mut self.sinks {
            if let Err(err) = sink.flush() {
                if first.is_ok() {
                    first = Err(err);
                }
            }
        }
        first
    }

    fn keep(&mut self, err: io::Error) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }
}

impl<E, A> Observer<E, A> for Recorder
where
    E: HasRecord + HasRunResult,
    A: CanAbort,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        if let Some(record) = event.record() {
            let written = self
                .sinks
                .iter_mut()
                .try_for_each(|sink| sink.write_tick(record));
            return match written {
                Ok(()) => {
                    self.written += 1;
                    None
                }
                Err(err) => {
                    warn!(%err, "tick write failed, aborting run");
                    let action = A::abort(format!("output write failed: {err}"));
                    self.keep(err);
                    Some(action)
                }
            };
        }

        if let Some(result) = event.run_result() {
            if let Err(err) = self.flush_all() {
                error!(%err, "flushing tick sinks failed");
                self.keep(err);
            }
            if let Some(summary) = &mut self.summary {
                if let Err(err) = summary.write_summary(&result.summary()) {
                    error!(%err, "writing the run summary failed");
                    self.keep(err);
                }
            }
        }

        None
    }
}

impl Drop for Recorder {
    fn drop(&mut self) {
        if let Err(err) = self.flush_all() {
            warn!(%err, "flushing tick sinks on drop failed");
        }
    }
}
