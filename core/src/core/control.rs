// src/core/control.rs

//! Flow signals returned by handlers and the outcome of a whole run.

/// Returned by every handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
  /// Run the remaining handlers of this step, then the following steps.
  Continue,
  /// Halt the pipeline. Nothing after this handler runs.
  Stop,
}

/// Result of a run that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
  Completed,
  Stopped,
}

impl Outcome {
  pub fn is_completed(self) -> bool {
    self == Outcome::Completed
  }
}
