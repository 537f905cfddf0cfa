// src/lib.rs

//! stepflow: a small asynchronous step-pipeline engine.
//!
//! A pipeline is an ordered list of named steps operating on one shared
//! context type. Each step may carry `before`, `on` and `after` handlers,
//! may be optional, and may be skipped by a predicate over the context.
//! Handlers decide whether the run continues or stops early, and the first
//! handler error aborts the run.
//!
//! A [`Registry`] maps context types to pipelines so callers only need to
//! build a context and hand it over:
//!
//! ```ignore
//! let registry = Registry::<AppError>::new();
//! registry.register(add_to_cart_pipeline());
//! let ctx = ContextData::new(AddToCartCtxData { .. });
//! registry.run(ctx.clone()).await?;
//! ```

pub mod core;
pub mod error;
pub mod pipeline;
pub mod registry;

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{Control, Outcome};
pub use crate::core::handler::{Handler, HandlerFuture};
pub use crate::core::step::{SkipCondition, StepDef};

pub use crate::pipeline::definition::{Phase, Pipeline};

pub use crate::error::{FlowError, FlowResult};

pub use crate::registry::Registry;
