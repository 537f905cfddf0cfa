// src/error.rs
use thiserror::Error;

/// Failures raised by the engine itself, as opposed to failures returned by
/// user handlers. Application error types embed this via `From<FlowError>`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
  #[error("step not found: {step_name}")]
  StepNotFound { step_name: String },

  #[error("non-optional step '{step_name}' has no handlers")]
  HandlerMissing { step_name: String },

  #[error("no pipeline registered for context type {type_name}")]
  NotRegistered { type_name: &'static str },

  #[error("context type mismatch, expected {expected}")]
  TypeMismatch { expected: &'static str },

  #[error("internal engine error: {0}")]
  Internal(String),
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
