// src/pipeline/hooks.rs

//! Handler registration.

use crate::core::context_data::ContextData;
use crate::core::control::Control;
use crate::core::handler;
use crate::error::FlowError;
use crate::pipeline::definition::{Phase, Pipeline};
use std::future::Future;
use tracing::{event, Level};

impl<T, E> Pipeline<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Attaches `handler_fn` to `step_name` in the given phase. Handlers of the
  /// same phase run in registration order.
  pub fn add_handler<F, Fut, UserErr>(&mut self, phase: Phase, step_name: &str, handler_fn: F)
  where
    F: Fn(ContextData<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Control, UserErr>> + Send + 'static,
    UserErr: Into<E> + 'static,
  {
    self.assert_step_exists(step_name);
    self
      .handlers
      .entry(step_name.to_string())
      .or_default()
      .phase_mut(phase)
      .push(handler::boxed(handler_fn));
    event!(Level::TRACE, step_name, phase = phase.as_str(), "handler registered");
  }

  pub fn before<F, Fut, UserErr>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(ContextData<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Control, UserErr>> + Send + 'static,
    UserErr: Into<E> + 'static,
  {
    self.add_handler(Phase::Before, step_name, handler_fn);
  }

  pub fn on<F, Fut, UserErr>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(ContextData<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Control, UserErr>> + Send + 'static,
    UserErr: Into<E> + 'static,
  {
    self.add_handler(Phase::On, step_name, handler_fn);
  }

  pub fn after<F, Fut, UserErr>(&mut self, step_name: &str, handler_fn: F)
  where
    F: Fn(ContextData<T>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Control, UserErr>> + Send + 'static,
    UserErr: Into<E> + 'static,
  {
    self.add_handler(Phase::After, step_name, handler_fn);
  }
}
