// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use stepflow::ContextData;
use tracing::{info, instrument};

use super::run_workflow;
use crate::errors::AppError;
use crate::pipelines::common_steps::resolve_cart;
use crate::pipelines::contexts::{AddToCartCtxData, CartLineInput, RemoveFromCartCtxData, UpdateCartQuantityCtxData};
use crate::state::AppState;

fn unavailable() -> AppError {
  AppError::Internal("Cart update completed, but the cart is unavailable.".to_string())
}

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, payload),
  fields(user_id = ?payload.user_id, product_id = ?payload.product_id, size = ?payload.size)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CartLineInput>,
) -> Result<HttpResponse, AppError> {
  let ctx = ContextData::new(AddToCartCtxData::new(app_state.get_ref().clone(), payload.into_inner()));
  run_workflow(&app_state, ctx.clone()).await?;
  let view = ctx.read().cart.clone().ok_or_else(unavailable)?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(
  name = "handler::remove_from_cart",
  skip(app_state, payload),
  fields(user_id = ?payload.user_id, product_id = ?payload.product_id, size = ?payload.size)
)]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CartLineInput>,
) -> Result<HttpResponse, AppError> {
  let ctx = ContextData::new(RemoveFromCartCtxData::new(app_state.get_ref().clone(), payload.into_inner()));
  run_workflow(&app_state, ctx.clone()).await?;
  let view = ctx.read().cart.clone().ok_or_else(unavailable)?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(
  name = "handler::update_cart_quantity",
  skip(app_state, payload),
  fields(user_id = ?payload.user_id, product_id = ?payload.product_id, size = ?payload.size, operation = ?payload.operation)
)]
pub async fn update_cart_quantity_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CartLineInput>,
) -> Result<HttpResponse, AppError> {
  let ctx = ContextData::new(UpdateCartQuantityCtxData::new(app_state.get_ref().clone(), payload.into_inner()));
  run_workflow(&app_state, ctx.clone()).await?;
  let view = ctx.read().cart.clone().ok_or_else(unavailable)?;
  Ok(HttpResponse::Ok().json(view))
}

/// Responds with `null` for a user who has never added anything.
#[instrument(name = "handler::get_cart", skip(app_state, path), fields(user_id = %path.as_str()))]
pub async fn get_cart_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  let view = match app_state.store.load_cart(&user_id).await? {
    Some(cart) => Some(resolve_cart(&app_state, &cart).await?),
    None => {
      info!("No cart stored for user.");
      None
    }
  };
  Ok(HttpResponse::Ok().json(view))
}
