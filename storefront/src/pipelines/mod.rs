// storefront/src/pipelines/mod.rs

//! Defines and registers every storefront pipeline.

use crate::errors::AppError;
use stepflow::Registry;

pub mod common_steps;
pub mod contexts;

pub mod cart_pipeline;
pub mod order_pipeline;
pub mod wishlist_pipeline;

/// Called once when [`crate::state::AppState`] is built.
pub fn register_all_pipelines(registry: &Registry<AppError>) {
  tracing::info!("Registering storefront pipelines...");

  cart_pipeline::register_add_to_cart_pipeline(registry);
  cart_pipeline::register_remove_from_cart_pipeline(registry);
  cart_pipeline::register_update_cart_quantity_pipeline(registry);
  wishlist_pipeline::register_add_to_wishlist_pipeline(registry);
  wishlist_pipeline::register_remove_from_wishlist_pipeline(registry);
  order_pipeline::register_place_order_pipeline(registry);

  tracing::info!(count = registry.len(), "All storefront pipelines registered.");
}
