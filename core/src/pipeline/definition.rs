// src/pipeline/definition.rs

//! The `Pipeline<T, E>` type and its structural operations.

use crate::core::handler::Handler;
use crate::core::step::{SkipCondition, StepDef};
use crate::error::FlowError;
use std::collections::HashMap;

/// When a handler runs relative to the other handlers of its step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
  Before,
  On,
  After,
}

impl Phase {
  pub const ALL: [Phase; 3] = [Phase::Before, Phase::On, Phase::After];

  pub fn as_str(self) -> &'static str {
    match self {
      Phase::Before => "before",
      Phase::On => "on",
      Phase::After => "after",
    }
  }
}

pub(crate) struct StepHandlers<T: 'static + Send + Sync, E> {
  pub(crate) before: Vec<Handler<T, E>>,
  pub(crate) on: Vec<Handler<T, E>>,
  pub(crate) after: Vec<Handler<T, E>>,
}

impl<T: 'static + Send + Sync, E> Default for StepHandlers<T, E> {
  fn default() -> Self {
    Self {
      before: Vec::new(),
      on: Vec::new(),
      after: Vec::new(),
    }
  }
}

impl<T: 'static + Send + Sync, E> StepHandlers<T, E> {
  pub(crate) fn phase(&self, phase: Phase) -> &[Handler<T, E>] {
    match phase {
      Phase::Before => &self.before,
      Phase::On => &self.on,
      Phase::After => &self.after,
    }
  }

  pub(crate) fn phase_mut(&mut self, phase: Phase) -> &mut Vec<Handler<T, E>> {
    match phase {
      Phase::Before => &mut self.before,
      Phase::On => &mut self.on,
      Phase::After => &mut self.after,
    }
  }

  pub(crate) fn is_empty(&self) -> bool {
    self.before.is_empty() && self.on.is_empty() && self.after.is_empty()
  }
}

/// An ordered set of named steps over the context type `T`, whose handlers
/// fail with `E`. `E` must absorb engine failures, hence `From<FlowError>`.
pub struct Pipeline<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) steps: Vec<StepDef<T>>,
  pub(crate) handlers: HashMap<String, StepHandlers<T, E>>,
}

impl<T, E> Pipeline<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Builds a pipeline from `(name, optional, skip_if)` triples.
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<T>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef::new(*name, *optional, skip_if.clone()))
      .collect();

    Self {
      steps,
      handlers: HashMap::new(),
    }
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }

  pub fn has_step(&self, step_name: &str) -> bool {
    self.steps.iter().any(|s| s.name == step_name)
  }

  fn position(&self, step_name: &str) -> Result<usize, FlowError> {
    self
      .steps
      .iter()
      .position(|s| s.name == step_name)
      .ok_or_else(|| FlowError::StepNotFound {
        step_name: step_name.to_string(),
      })
  }

  /// Inserts a new step directly after `existing`.
  pub fn insert_step_after(
    &mut self,
    existing: &str,
    name: impl Into<String>,
    optional: bool,
    skip_if: Option<SkipCondition<T>>,
  ) -> Result<(), FlowError> {
    let idx = self.position(existing)?;
    let step = StepDef::new(name, optional, skip_if);
    if self.has_step(&step.name) {
      return Err(FlowError::Internal(format!("step '{}' is already defined", step.name)));
    }
    self.steps.insert(idx + 1, step);
    Ok(())
  }

  /// Removes a step and every handler attached to it. Unknown names are ignored.
  pub fn remove_step(&mut self, step_name: &str) {
    self.steps.retain(|s| s.name != step_name);
    self.handlers.remove(step_name);
  }

  /// Panics on an unknown step: registering a handler for a step that was
  /// never declared is a wiring bug, not a runtime condition.
  pub(crate) fn assert_step_exists(&self, step_name: &str) {
    assert!(
      self.has_step(step_name),
      "stepflow: step '{step_name}' is not declared in this pipeline"
    );
  }
}
