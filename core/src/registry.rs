// src/registry.rs

//! `Registry<E>`: pipelines keyed by their context type.
//!
//! Each context type has at most one pipeline, so running a workflow only
//! needs the context: `registry.run(ContextData::new(MyCtx { .. }))`.

use crate::core::context_data::ContextData;
use crate::core::control::Outcome;
use crate::error::FlowError;
use crate::pipeline::definition::Pipeline;

use async_trait::async_trait;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{event, instrument, Level};

#[async_trait]
trait ErasedPipeline<AppErr>: Send + Sync
where
  AppErr: std::error::Error + Send + Sync + 'static,
{
  /// `ctx` holds a `ContextData<T>` for the wrapped pipeline's `T`.
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<Outcome, AppErr>;
}

struct TypedPipeline<T, PipeErr, AppErr>
where
  T: 'static + Send + Sync,
  PipeErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pipeline: Pipeline<T, PipeErr>,
  _app_err: PhantomData<fn() -> AppErr>,
}

#[async_trait]
impl<T, PipeErr, AppErr> ErasedPipeline<AppErr> for TypedPipeline<T, PipeErr, AppErr>
where
  T: 'static + Send + Sync,
  PipeErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
  AppErr: std::error::Error + From<PipeErr> + From<FlowError> + Send + Sync + 'static,
{
  async fn run_erased(&self, ctx: Box<dyn Any + Send>) -> Result<Outcome, AppErr> {
    let ctx = ctx.downcast::<ContextData<T>>().map_err(|_| {
      AppErr::from(FlowError::TypeMismatch {
        expected: std::any::type_name::<ContextData<T>>(),
      })
    })?;
    self.pipeline.run(*ctx).await.map_err(AppErr::from)
  }
}

/// Dispatches contexts to the pipeline registered for their type.
/// `AppErr` is what [`Registry::run`] returns.
pub struct Registry<AppErr = FlowError>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pipelines: RwLock<HashMap<TypeId, Arc<dyn ErasedPipeline<AppErr>>>>,
}

impl<AppErr> Registry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub fn new() -> Self {
    Self {
      pipelines: RwLock::new(HashMap::new()),
    }
  }

  /// Registers `pipeline` for context type `T`, replacing any previous one.
  pub fn register<T, PipeErr>(&self, pipeline: Pipeline<T, PipeErr>)
  where
    T: 'static + Send + Sync,
    PipeErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
    AppErr: From<PipeErr>,
  {
    event!(
      Level::DEBUG,
      context = std::any::type_name::<T>(),
      steps = ?pipeline.step_names(),
      "registering pipeline"
    );
    let typed = TypedPipeline::<T, PipeErr, AppErr> {
      pipeline,
      _app_err: PhantomData,
    };
    self.pipelines.write().insert(TypeId::of::<T>(), Arc::new(typed));
  }

  pub fn contains<T: 'static>(&self) -> bool {
    self.pipelines.read().contains_key(&TypeId::of::<T>())
  }

  pub fn len(&self) -> usize {
    self.pipelines.read().len()
  }

  pub fn is_empty(&self) -> bool {
    self.pipelines.read().is_empty()
  }

  /// Runs the pipeline registered for `T` against `ctx`.
  #[instrument(name = "Registry::run", skip_all, fields(context = std::any::type_name::<T>()))]
  pub async fn run<T>(&self, ctx: ContextData<T>) -> Result<Outcome, AppErr>
  where
    T: 'static + Send + Sync,
  {
    let runner = self.pipelines.read().get(&TypeId::of::<T>()).cloned();
    let Some(runner) = runner else {
      event!(Level::ERROR, "no pipeline registered for context");
      return Err(AppErr::from(FlowError::NotRegistered {
        type_name: std::any::type_name::<T>(),
      }));
    };
    runner.run_erased(Box::new(ctx)).await
  }
}

impl<AppErr> Default for Registry<AppErr>
where
  AppErr: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  fn default() -> Self {
    Self::new()
  }
}
