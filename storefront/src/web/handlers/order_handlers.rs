// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use stepflow::ContextData;
use tracing::{info, instrument, warn};

use super::run_workflow;
use crate::errors::AppError;
use crate::pipelines::contexts::{PlaceOrderCtxData, PlaceOrderInput};
use crate::state::AppState;

#[instrument(name = "handler::place_order", skip(app_state, payload), fields(user_id = ?payload.user_id))]
pub async fn place_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<PlaceOrderInput>,
) -> Result<HttpResponse, AppError> {
  let ctx = ContextData::new(PlaceOrderCtxData::new(app_state.get_ref().clone(), payload.into_inner()));
  run_workflow(&app_state, ctx.clone()).await?;

  let (order, cart_cleared) = {
    let guard = ctx.read();
    (guard.order.clone(), guard.cart_cleared)
  };
  let order = order.ok_or_else(|| AppError::Internal("Order pipeline completed without an order.".to_string()))?;

  if cart_cleared {
    info!(order_id = %order.id, "Order created and cart cleared.");
  } else {
    warn!(order_id = %order.id, "Order created but the cart could not be cleared.");
  }
  Ok(HttpResponse::Created().json(order))
}

#[instrument(name = "handler::list_orders", skip(app_state, path), fields(user_id = %path.as_str()))]
pub async fn list_orders_handler(app_state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse, AppError> {
  let orders = app_state.store.list_orders(&path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(orders))
}
