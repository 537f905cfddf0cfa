// storefront/src/pipelines/order_pipeline.rs

//! `validate_shipping_details -> persist_order -> clear_cart`.
//!
//! The order and the cart are written separately. Once `persist_order` has
//! succeeded the order stands: `clear_cart` retries a bounded number of times
//! and, if the cart still cannot be emptied, logs and lets the run complete.

use std::time::Duration;
use stepflow::{Control, ContextData, Pipeline, Registry};
use tracing::{error, info, instrument, warn};

use super::common_steps::{mutate_document, require_fields};
use crate::errors::{AppError, Result as AppResult};
use crate::models::{Cart, Order, ShippingDetails};
use crate::pipelines::contexts::{PlaceOrderCtxData, PlaceOrderInput};
use crate::state::AppState;

const CLEAR_BACKOFF: Duration = Duration::from_millis(25);

pub fn register_place_order_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<PlaceOrderCtxData, AppError>::new(&[
    ("validate_shipping_details", false, None),
    ("persist_order", false, None),
    ("clear_cart", false, None),
  ]);

  p.on("validate_shipping_details", validate_shipping_details);
  p.on("persist_order", persist_order);
  p.after("persist_order", |ctx: ContextData<PlaceOrderCtxData>| async move {
    if let Some(order) = ctx.read().order.as_ref() {
      info!(order_id = %order.id, user_id = %order.user_id, payment_method = %order.payment_method, "Order placed.");
    }
    Ok::<_, AppError>(Control::Continue)
  });
  p.on("clear_cart", clear_cart);

  registry.register(p);
  info!("Place Order pipeline registered.");
}

fn shipping_details(input: &PlaceOrderInput) -> AppResult<(String, ShippingDetails)> {
  let [user_id, street, house, zip, city, first_name, last_name, email, phone, payment_method] = require_fields([
    ("userId", input.user_id.as_deref()),
    ("street", input.street.as_deref()),
    ("house", input.house.as_deref()),
    ("zip", input.zip.as_deref()),
    ("city", input.city.as_deref()),
    ("firstName", input.first_name.as_deref()),
    ("lastName", input.last_name.as_deref()),
    ("email", input.email.as_deref()),
    ("phone", input.phone.as_deref()),
    ("paymentMethod", input.payment_method.as_deref()),
  ])?;

  Ok((
    user_id,
    ShippingDetails {
      street,
      house,
      zip,
      city,
      first_name,
      last_name,
      email,
      phone,
      payment_method,
    },
  ))
}

#[instrument(name = "order_step::validate_shipping_details", skip(ctx), err)]
async fn validate_shipping_details(ctx: ContextData<PlaceOrderCtxData>) -> AppResult<Control> {
  let (user_id, shipping) = {
    let guard = ctx.read();
    shipping_details(&guard.input)?
  };

  let mut guard = ctx.write();
  guard.user_id = Some(user_id);
  guard.shipping = Some(shipping);
  Ok(Control::Continue)
}

#[instrument(name = "order_step::persist_order", skip(ctx), err)]
async fn persist_order(ctx: ContextData<PlaceOrderCtxData>) -> AppResult<Control> {
  let (user_id, shipping, store) = {
    let guard = ctx.read();
    match (guard.user_id.clone(), guard.shipping.clone()) {
      (Some(user_id), Some(shipping)) => (user_id, shipping, guard.app_state.store.clone()),
      _ => return Err(AppError::Internal("order context was not validated".to_string())),
    }
  };

  let order = Order::place(user_id, shipping);
  store.insert_order(&order).await?;
  ctx.write().order = Some(order);
  Ok(Control::Continue)
}

/// Empties the user's cart; a user without a cart counts as cleared.
async fn clear_cart_once(state: &AppState, user_id: &str) -> AppResult<()> {
  match mutate_document::<Cart, _>(state, user_id, false, |cart| Ok(cart.clear())).await {
    Ok(_) | Err(AppError::NotFound(_)) => Ok(()),
    Err(e) => Err(e),
  }
}

#[instrument(name = "order_step::clear_cart", skip(ctx))]
async fn clear_cart(ctx: ContextData<PlaceOrderCtxData>) -> AppResult<Control> {
  let (user_id, state) = {
    let guard = ctx.read();
    match guard.order.as_ref() {
      Some(order) => (order.user_id.clone(), guard.app_state.clone()),
      None => return Err(AppError::Internal("clear_cart ran without a persisted order".to_string())),
    }
  };

  let attempts = state.config.cart_clear_attempts;
  let mut cleared = false;
  for attempt in 1..=attempts {
    match clear_cart_once(&state, &user_id).await {
      Ok(()) => {
        cleared = true;
        break;
      }
      Err(e) if attempt < attempts => {
        warn!(%user_id, attempt, max_attempts = attempts, error = %e, "Failed to clear cart, retrying.");
        tokio::time::sleep(CLEAR_BACKOFF * attempt).await;
      }
      Err(e) => {
        error!(%user_id, attempts, error = %e, "Giving up on clearing cart; the order stands.");
      }
    }
  }

  ctx.write().cart_cleared = cleared;
  Ok(Control::Continue)
}
