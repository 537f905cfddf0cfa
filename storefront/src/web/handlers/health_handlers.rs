// storefront/src/web/handlers/health_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{error, instrument};

use crate::state::AppState;

/// Liveness only; does not touch the store.
pub async fn root_handler() -> HttpResponse {
  HttpResponse::Ok().json("Server work")
}

/// 200 while the store answers a ping, 503 otherwise.
#[instrument(name = "handler::health", skip(app_state))]
pub async fn health_check_handler(app_state: web::Data<AppState>) -> HttpResponse {
  match app_state.store.ping().await {
    Ok(()) => HttpResponse::Ok().json(json!({ "status": "ok" })),
    Err(e) => {
      error!(error = %e, "Health check failed to reach the store.");
      HttpResponse::ServiceUnavailable().json(json!({ "status": "unavailable" }))
    }
  }
}
