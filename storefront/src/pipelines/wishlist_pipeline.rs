// storefront/src/pipelines/wishlist_pipeline.rs

use stepflow::{Control, ContextData, Pipeline, Registry};
use tracing::{debug, info, instrument};

use super::common_steps::{mutate_document, require_fields, resolve_wishlist};
use crate::errors::AppError;
use crate::models::Wishlist;
use crate::pipelines::contexts::{AddToWishlistCtxData, RemoveFromWishlistCtxData, WishlistInput, WishlistKey};

fn wishlist_key(input: &WishlistInput) -> Result<WishlistKey, AppError> {
  let [user_id, product_id] = require_fields([
    ("userId", input.user_id.as_deref()),
    ("productId", input.product_id.as_deref()),
  ])?;
  Ok(WishlistKey { user_id, product_id })
}

fn unvalidated() -> AppError {
  AppError::Internal("wishlist pipeline context was not validated".to_string())
}

pub fn register_add_to_wishlist_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<AddToWishlistCtxData, AppError>::new(&[
    ("validate_wishlist_input", false, None),
    ("append_wishlist_entry", false, None),
  ]);

  p.on("validate_wishlist_input", |ctx: ContextData<AddToWishlistCtxData>| async move {
    let key = {
      let guard = ctx.read();
      wishlist_key(&guard.input)?
    };
    ctx.write().key = Some(key);
    Ok::<_, AppError>(Control::Continue)
  });
  p.on("append_wishlist_entry", append_wishlist_entry);

  registry.register(p);
  info!("Add to Wishlist pipeline registered.");
}

#[instrument(name = "wishlist_step::append_entry", skip(ctx), err)]
async fn append_wishlist_entry(ctx: ContextData<AddToWishlistCtxData>) -> Result<Control, AppError> {
  let (key, state) = {
    let guard = ctx.read();
    (guard.key.clone().ok_or_else(unvalidated)?, guard.app_state.clone())
  };
  let dedup = state.config.wishlist_dedup;

  let wishlist = mutate_document::<Wishlist, _>(&state, &key.user_id, true, |wishlist| {
    let added = wishlist.add(&key.product_id, dedup);
    if !added {
      debug!(product_id = %key.product_id, "Product already on wishlist.");
    }
    Ok(added)
  })
  .await?;
  info!(user_id = %key.user_id, product_id = %key.product_id, entries = wishlist.products.len(), "Wishlist updated.");

  let view = resolve_wishlist(&state, &wishlist).await?;
  ctx.write().wishlist = Some(view);
  Ok(Control::Continue)
}

pub fn register_remove_from_wishlist_pipeline(registry: &Registry<AppError>) {
  let mut p = Pipeline::<RemoveFromWishlistCtxData, AppError>::new(&[
    ("validate_wishlist_input", false, None),
    ("remove_wishlist_entry", false, None),
  ]);

  p.on("validate_wishlist_input", |ctx: ContextData<RemoveFromWishlistCtxData>| async move {
    let key = {
      let guard = ctx.read();
      wishlist_key(&guard.input)?
    };
    ctx.write().key = Some(key);
    Ok::<_, AppError>(Control::Continue)
  });
  p.on("remove_wishlist_entry", remove_wishlist_entry);

  registry.register(p);
  info!("Remove from Wishlist pipeline registered.");
}

#[instrument(name = "wishlist_step::remove_entry", skip(ctx), err)]
async fn remove_wishlist_entry(ctx: ContextData<RemoveFromWishlistCtxData>) -> Result<Control, AppError> {
  let (key, state) = {
    let guard = ctx.read();
    (guard.key.clone().ok_or_else(unvalidated)?, guard.app_state.clone())
  };

  let wishlist = mutate_document::<Wishlist, _>(&state, &key.user_id, false, |wishlist| {
    Ok(wishlist.remove(&key.product_id) > 0)
  })
  .await?;

  let view = resolve_wishlist(&state, &wishlist).await?;
  ctx.write().wishlist = Some(view);
  Ok(Control::Continue)
}
