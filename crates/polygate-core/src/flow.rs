//! Flow control handle passed into each policy invocation.

use crate::error::GateError;

/// Per-invocation control object.
///
/// A well-behaved handler calls exactly one of `proceed` or `fail` per
/// invocation, optionally after mutating the request context.
pub trait Flow {
    /// Advance to the next pipeline stage.
    fn proceed(&mut self);

    /// Abort the chain with an error.
    fn fail(&mut self, error: GateError);
}

/// What a handler decided, as observed by [`RecordingFlow`].
#[derive(Debug)]
pub enum FlowOutcome {
    Proceeded,
    Failed(GateError),
}

/// Flow implementation that records the handler's decision.
///
/// Used for one-shot invocations outside a full pipeline and throughout the
/// test suites. The last call wins if a misbehaving handler signals twice.
#[derive(Debug, Default)]
pub struct RecordingFlow {
    outcome: Option<FlowOutcome>,
}

impl RecordingFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outcome(&self) -> Option<&FlowOutcome> {
        self.outcome.as_ref()
    }

    pub fn proceeded(&self) -> bool {
        matches!(self.outcome, Some(FlowOutcome::Proceeded))
    }

    /// The error passed to `fail`, if the handler aborted.
    pub fn failure(&self) -> Option<&GateError> {
        match &self.outcome {
            Some(FlowOutcome::Failed(e)) => Some(e),
            _ => None,
        }
    }
}

impl Flow for RecordingFlow {
    fn proceed(&mut self) {
        self.outcome = Some(FlowOutcome::Proceeded);
    }

    fn fail(&mut self, error: GateError) {
        self.outcome = Some(FlowOutcome::Failed(error));
    }
}
