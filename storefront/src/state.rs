// storefront/src/state.rs

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::pipelines;
use crate::store::Store;
use std::sync::Arc;
use stepflow::Registry;

#[derive(Clone)]
pub struct AppState {
  pub store: Arc<dyn Store>,
  pub workflows: Arc<Registry<AppError>>,
  pub config: Arc<AppConfig>,
}

impl AppState {
  /// Wraps the store and registers every storefront pipeline.
  pub fn new(store: Arc<dyn Store>, config: AppConfig) -> Self {
    let workflows = Arc::new(Registry::<AppError>::new());
    pipelines::register_all_pipelines(&workflows);

    Self {
      store,
      workflows,
      config: Arc::new(config),
    }
  }
}
