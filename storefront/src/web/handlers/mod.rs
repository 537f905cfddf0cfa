// storefront/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod health_handlers;
pub mod order_handlers;
pub mod product_handlers;
pub mod wishlist_handlers;

use stepflow::ContextData;
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

/// Runs the pipeline registered for `T`. None of the storefront pipelines stop
/// early, so a stopped run is reported as an internal error.
pub(crate) async fn run_workflow<T>(state: &AppState, ctx: ContextData<T>) -> Result<(), AppError>
where
  T: Send + Sync + 'static,
{
  if state.workflows.run(ctx).await?.is_completed() {
    return Ok(());
  }
  warn!(context = std::any::type_name::<T>(), "Pipeline was stopped by a handler.");
  Err(AppError::Internal("Request processing was halted.".to_string()))
}
