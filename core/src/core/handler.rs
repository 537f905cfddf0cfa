// src/core/handler.rs

use crate::core::context_data::ContextData;
use crate::core::control::Control;
use std::future::Future;
use std::pin::Pin;

pub type HandlerFuture<E> = Pin<Box<dyn Future<Output = Result<Control, E>> + Send>>;

/// A boxed step handler. Each invocation receives a clone of the shared
/// context handle; lock guards taken inside must be released before awaiting.
pub type Handler<T, E> = Box<dyn Fn(ContextData<T>) -> HandlerFuture<E> + Send + Sync>;

/// Wraps a user closure, converting its error type into the pipeline's.
pub(crate) fn boxed<T, E, F, Fut, UserErr>(handler_fn: F) -> Handler<T, E>
where
  T: 'static + Send + Sync,
  E: 'static,
  F: Fn(ContextData<T>) -> Fut + Send + Sync + 'static,
  Fut: Future<Output = Result<Control, UserErr>> + Send + 'static,
  UserErr: Into<E> + 'static,
{
  Box::new(move |ctx| {
    let fut = handler_fn(ctx);
    Box::pin(async move { fut.await.map_err(Into::into) })
  })
}
