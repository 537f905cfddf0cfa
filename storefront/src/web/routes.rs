// storefront/src/web/routes.rs

use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::errors::AppError;
use crate::web::handlers::{
  cart_handlers, health_handlers, order_handlers, product_handlers, wishlist_handlers,
};

/// Malformed bodies get the same `{"error": ...}` shape as validation failures.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
  AppError::Validation(format!("Invalid request body: {err}")).into()
}

/// Called from `main.rs` and the HTTP tests to mount every route.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg
    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
    .route("/", web::get().to(health_handlers::root_handler))
    .route("/health", web::get().to(health_handlers::health_check_handler))
    .route("/products", web::get().to(product_handlers::list_products_handler))
    .service(
      web::resource("/cart")
        .route(web::post().to(cart_handlers::add_to_cart_handler))
        .route(web::delete().to(cart_handlers::remove_from_cart_handler))
        .route(web::patch().to(cart_handlers::update_cart_quantity_handler)),
    )
    .route("/cart/{user_id}", web::get().to(cart_handlers::get_cart_handler))
    .service(
      web::resource("/wishlist")
        .route(web::post().to(wishlist_handlers::add_to_wishlist_handler))
        .route(web::delete().to(wishlist_handlers::remove_from_wishlist_handler)),
    )
    .route("/wishlist/{user_id}", web::get().to(wishlist_handlers::get_wishlist_handler))
    .route("/orders", web::post().to(order_handlers::place_order_handler))
    .route("/orders/{user_id}", web::get().to(order_handlers::list_orders_handler));
}
