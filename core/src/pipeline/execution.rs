// src/pipeline/execution.rs

//! `Pipeline::run`.

use crate::core::context_data::ContextData;
use crate::core::control::{Control, Outcome};
use crate::error::FlowError;
use crate::pipeline::definition::{Phase, Pipeline};
use tracing::{event, info_span, Instrument, Level};

impl<T, E> Pipeline<T, E>
where
  T: 'static + Send + Sync,
  E: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Runs every step in order against `ctx`.
  ///
  /// A skipped step, or an optional step without handlers, is passed over. A
  /// required step without handlers fails with [`FlowError::HandlerMissing`].
  /// Within a step the `before`, `on` and `after` handlers run in that order;
  /// the first `Control::Stop` ends the run as [`Outcome::Stopped`] and the
  /// first error is returned as-is.
  pub async fn run(&self, ctx: ContextData<T>) -> Result<Outcome, E> {
    event!(
      Level::DEBUG,
      context = std::any::type_name::<T>(),
      steps = self.steps.len(),
      "pipeline run starting"
    );

    for (step_index, step) in self.steps.iter().enumerate() {
      let span = info_span!("pipeline_step", step = %step.name, step_index);

      if step.should_skip(&ctx) {
        event!(parent: &span, Level::DEBUG, "step skipped by condition");
        continue;
      }

      let Some(handlers) = self.handlers.get(&step.name).filter(|h| !h.is_empty()) else {
        if step.optional {
          event!(parent: &span, Level::DEBUG, "optional step has no handlers");
          continue;
        }
        event!(parent: &span, Level::ERROR, "required step has no handlers");
        return Err(E::from(FlowError::HandlerMissing {
          step_name: step.name.clone(),
        }));
      };

      for phase in Phase::ALL {
        for (handler_index, handler_fn) in handlers.phase(phase).iter().enumerate() {
          let handler_span = tracing::debug_span!(parent: &span, "handler", phase = phase.as_str(), handler_index);
          match handler_fn(ctx.clone()).instrument(handler_span).await {
            Ok(Control::Continue) => {}
            Ok(Control::Stop) => {
              event!(parent: &span, Level::INFO, phase = phase.as_str(), "pipeline stopped by handler");
              return Ok(Outcome::Stopped);
            }
            Err(e) => {
              event!(parent: &span, Level::WARN, phase = phase.as_str(), error = %e, "handler failed");
              return Err(e);
            }
          }
        }
      }
    }

    event!(Level::DEBUG, "pipeline run completed");
    Ok(Outcome::Completed)
  }
}
