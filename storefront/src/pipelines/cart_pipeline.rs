// storefront/src/pipelines/cart_pipeline.rs

use stepflow::{Control, ContextData, Pipeline, Registry};
use tracing::{info, instrument, warn};

use super::common_steps::{mutate_document, require_fields, resolve_cart};
use crate::errors::AppError;
use crate::models::Cart;
use crate::pipelines::contexts::{
  AddToCartCtxData, CartLineInput, CartLineKey, RemoveFromCartCtxData, UpdateCartQuantityCtxData,
};

fn line_key(input: &CartLineInput) -> Result<CartLineKey, AppError> {
  let [user_id, product_id, size] = require_fields([
    ("userId", input.user_id.as_deref()),
    ("productId", input.product_id.as_deref()),
    ("size", input.size.as_deref()),
  ])?;
  Ok(CartLineKey {
    user_id,
    product_id,
    size,
  })
}

fn requested_quantity(raw: Option<i64>) -> Result<u32, AppError> {
  match raw {
    None => Ok(1),
    Some(q) if q >= 1 => u32::try_from(q).map_err(|_| AppError::Validation(format!("Quantity {q} is too large."))),
    Some(q) => Err(AppError::Validation(format!("Quantity must be at least 1, got {q}."))),
  }
}

// --- Add ---

pub fn register_add_to_cart_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<AddToCartCtxData, AppError>::new(&[
    ("validate_cart_input", false, None),
    ("fetch_product_for_cart", false, None),
    ("merge_cart_line", false, None),
  ]);

  p.on("validate_cart_input", validate_add_input);
  p.on("fetch_product_for_cart", fetch_product_for_cart);
  p.on("merge_cart_line", merge_cart_line);

  registry.register(p);
  info!("Add to Cart pipeline registered.");
}

#[instrument(name = "cart_step::validate_add_input", skip(ctx), err)]
async fn validate_add_input(ctx: ContextData<AddToCartCtxData>) -> Result<Control, AppError> {
  let input = { ctx.read().input.clone() };
  let key = line_key(&input)?;
  let quantity = requested_quantity(input.quantity)?;

  let mut guard = ctx.write();
  guard.key = Some(key);
  guard.quantity = quantity;
  Ok(Control::Continue)
}

#[instrument(name = "cart_step::fetch_product", skip(ctx), err)]
async fn fetch_product_for_cart(ctx: ContextData<AddToCartCtxData>) -> Result<Control, AppError> {
  let (product_id, store) = {
    let guard = ctx.read();
    let key = guard.key.as_ref().ok_or_else(missing_key)?;
    (key.product_id.clone(), guard.app_state.store.clone())
  };

  match store.find_product(&product_id).await? {
    Some(product) => {
      info!(product_id = %product.id, price = %product.price, "Product found for cart.");
      Ok(Control::Continue)
    }
    None => {
      warn!(%product_id, "Product not found.");
      Err(AppError::NotFound(format!("Product with ID {product_id} not found.")))
    }
  }
}

#[instrument(name = "cart_step::merge_line", skip(ctx), err)]
async fn merge_cart_line(ctx: ContextData<AddToCartCtxData>) -> Result<Control, AppError> {
  let (key, quantity, state) = {
    let guard = ctx.read();
    let key = guard.key.clone().ok_or_else(missing_key)?;
    (key, guard.quantity, guard.app_state.clone())
  };

  let cart = mutate_document::<Cart, _>(&state, &key.user_id, true, |cart| {
    cart.add(&key.product_id, &key.size, quantity);
    Ok(true)
  })
  .await?;
  info!(
    user_id = %key.user_id,
    product_id = %key.product_id,
    size = %key.size,
    quantity,
    revision = cart.revision,
    "Cart line merged."
  );

  let view = resolve_cart(&state, &cart).await?;
  ctx.write().cart = Some(view);
  Ok(Control::Continue)
}

// --- Remove ---

pub fn register_remove_from_cart_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<RemoveFromCartCtxData, AppError>::new(&[
    ("validate_cart_line", false, None),
    ("remove_cart_line", false, None),
  ]);

  p.on("validate_cart_line", |ctx: ContextData<RemoveFromCartCtxData>| async move {
    let key = {
      let guard = ctx.read();
      line_key(&guard.input)?
    };
    ctx.write().key = Some(key);
    Ok::<_, AppError>(Control::Continue)
  });
  p.on("remove_cart_line", remove_cart_line);

  registry.register(p);
  info!("Remove from Cart pipeline registered.");
}

#[instrument(name = "cart_step::remove_line", skip(ctx), err)]
async fn remove_cart_line(ctx: ContextData<RemoveFromCartCtxData>) -> Result<Control, AppError> {
  let (key, state) = {
    let guard = ctx.read();
    (guard.key.clone().ok_or_else(missing_key)?, guard.app_state.clone())
  };

  let mut removed = 0;
  let cart = mutate_document::<Cart, _>(&state, &key.user_id, false, |cart| {
    removed = cart.remove(&key.product_id, &key.size);
    Ok(removed > 0)
  })
  .await?;
  if removed == 0 {
    info!(user_id = %key.user_id, product_id = %key.product_id, size = %key.size, "No matching cart line, cart unchanged.");
  }

  let view = resolve_cart(&state, &cart).await?;
  ctx.write().cart = Some(view);
  Ok(Control::Continue)
}

// --- Quantity ---

pub fn register_update_cart_quantity_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<UpdateCartQuantityCtxData, AppError>::new(&[
    ("validate_quantity_update", false, None),
    ("apply_quantity_operation", false, None),
  ]);

  p.on("validate_quantity_update", validate_quantity_update);
  p.on("apply_quantity_operation", apply_quantity_operation);

  registry.register(p);
  info!("Update Cart Quantity pipeline registered.");
}

#[instrument(name = "cart_step::validate_quantity_update", skip(ctx), err)]
async fn validate_quantity_update(ctx: ContextData<UpdateCartQuantityCtxData>) -> Result<Control, AppError> {
  let input = { ctx.read().input.clone() };
  let key = line_key(&input)?;
  let operation = input
    .operation
    .ok_or_else(|| AppError::Validation("Missing required fields: operation".to_string()))?;

  let mut guard = ctx.write();
  guard.key = Some(key);
  guard.operation = Some(operation);
  Ok(Control::Continue)
}

#[instrument(name = "cart_step::apply_quantity_operation", skip(ctx), err)]
async fn apply_quantity_operation(ctx: ContextData<UpdateCartQuantityCtxData>) -> Result<Control, AppError> {
  let (key, operation, state) = {
    let guard = ctx.read();
    (
      guard.key.clone().ok_or_else(missing_key)?,
      guard.operation.ok_or_else(missing_key)?,
      guard.app_state.clone(),
    )
  };

  let cart = mutate_document::<Cart, _>(&state, &key.user_id, false, |cart| {
    let before = cart.line(&key.product_id, &key.size).map(|l| l.quantity);
    match cart.update_quantity(&key.product_id, &key.size, operation) {
      Some(after) => Ok(before != Some(after)),
      None => Err(AppError::NotFound(format!(
        "Item {} (size {}) is not in the cart.",
        key.product_id, key.size
      ))),
    }
  })
  .await?;

  let view = resolve_cart(&state, &cart).await?;
  ctx.write().cart = Some(view);
  Ok(Control::Continue)
}

/// A later step ran without the validation step having filled the context.
fn missing_key() -> AppError {
  AppError::Internal("cart pipeline context was not validated".to_string())
}
