use keel_core::RuntimeAbort;

/// Actions an observer may request in response to a tick or stream event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Stop the run, reporting the given reason.
    Abort(RuntimeAbort),
}

impl Action {
    pub fn abort(reason: impl Into<String>) -> Self {
        Self::Abort(RuntimeAbort::new(reason))
    }
}
