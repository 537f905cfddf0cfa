// storefront/src/web/handlers/wishlist_handlers.rs

use actix_web::{web, HttpResponse};
use stepflow::ContextData;
use tracing::instrument;

use super::run_workflow;
use crate::errors::AppError;
use crate::pipelines::common_steps::resolve_wishlist;
use crate::pipelines::contexts::{AddToWishlistCtxData, RemoveFromWishlistCtxData, WishlistInput};
use crate::state::AppState;

fn unavailable() -> AppError {
  AppError::Internal("Wishlist update completed, but the wishlist is unavailable.".to_string())
}

#[instrument(
  name = "handler::add_to_wishlist",
  skip(app_state, payload),
  fields(user_id = ?payload.user_id, product_id = ?payload.product_id)
)]
pub async fn add_to_wishlist_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<WishlistInput>,
) -> Result<HttpResponse, AppError> {
  let ctx = ContextData::new(AddToWishlistCtxData::new(app_state.get_ref().clone(), payload.into_inner()));
  run_workflow(&app_state, ctx.clone()).await?;
  let view = ctx.read().wishlist.clone().ok_or_else(unavailable)?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(
  name = "handler::remove_from_wishlist",
  skip(app_state, payload),
  fields(user_id = ?payload.user_id, product_id = ?payload.product_id)
)]
pub async fn remove_from_wishlist_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<WishlistInput>,
) -> Result<HttpResponse, AppError> {
  let ctx = ContextData::new(RemoveFromWishlistCtxData::new(app_state.get_ref().clone(), payload.into_inner()));
  run_workflow(&app_state, ctx.clone()).await?;
  let view = ctx.read().wishlist.clone().ok_or_else(unavailable)?;
  Ok(HttpResponse::Ok().json(view))
}

#[instrument(name = "handler::get_wishlist", skip(app_state, path), fields(user_id = %path.as_str()))]
pub async fn get_wishlist_handler(
  app_state: web::Data<AppState>,
  path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  let view = match app_state.store.load_wishlist(&user_id).await? {
    Some(wishlist) => Some(resolve_wishlist(&app_state, &wishlist).await?),
    None => None,
  };
  Ok(HttpResponse::Ok().json(view))
}
