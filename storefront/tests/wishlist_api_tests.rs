// storefront/tests/wishlist_api_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::*;
use serde_json::{json, Value};
use storefront::config::AppConfig;
use storefront::state::AppState;
use storefront::web::configure_app_routes;

#[actix_web::test]
async fn test_wishlist_keeps_duplicates_by_default() {
  setup_tracing();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(test_state(seeded_store())))
      .configure(configure_app_routes),
  )
  .await;

  for _ in 0..2 {
    let req = test::TestRequest::post()
      .uri("/wishlist")
      .set_json(json!({ "userId": "u1", "productId": "p1" }))
      .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
  }

  let req = test::TestRequest::get().uri("/wishlist/u1").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  let entries = body["products"].as_array().unwrap();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0]["product"]["price"].as_f64(), Some(10.0));
}

#[actix_web::test]
async fn test_wishlist_dedup_when_configured() {
  setup_tracing();
  let config = AppConfig {
    wishlist_dedup: true,
    ..test_config()
  };
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(AppState::new(seeded_store(), config)))
      .configure(configure_app_routes),
  )
  .await;

  let mut last = Value::Null;
  for _ in 0..2 {
    let req = test::TestRequest::post()
      .uri("/wishlist")
      .set_json(json!({ "userId": "u1", "productId": "p1" }))
      .to_request();
    last = test::call_and_read_body_json(&app, req).await;
  }
  assert_eq!(last["products"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_wishlist_remove_drops_all_matches() {
  setup_tracing();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(test_state(seeded_store())))
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::delete()
    .uri("/wishlist")
    .set_json(json!({ "userId": "u1", "productId": "p1" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

  for product_id in ["p1", "p2", "p1"] {
    let req = test::TestRequest::post()
      .uri("/wishlist")
      .set_json(json!({ "userId": "u1", "productId": product_id }))
      .to_request();
    test::call_service(&app, req).await;
  }

  let req = test::TestRequest::delete()
    .uri("/wishlist")
    .set_json(json!({ "userId": "u1", "productId": "p1" }))
    .to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body["products"], json!([{ "productId": "p2", "product": {
    "id": "p2", "name": "Product p2", "price": 25.0, "category": "shirts", "image": "/images/p2.jpg"
  }}]));
}

#[actix_web::test]
async fn test_wishlist_validation_and_empty_read() {
  setup_tracing();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(test_state(seeded_store())))
      .configure(configure_app_routes),
  )
  .await;

  let req = test::TestRequest::post()
    .uri("/wishlist")
    .set_json(json!({ "userId": "u1" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

  let req = test::TestRequest::get().uri("/wishlist/u1").to_request();
  let body: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(body, Value::Null);
}

#[actix_web::test]
async fn test_wishlist_lost_race_is_reapplied_and_both_entries_survive() {
  setup_tracing();
  let store = seeded_store();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(test_state(store.clone())))
      .configure(configure_app_routes),
  )
  .await;

  store.set_wishlist_fault(WishlistFault::RaceOnce {
    product_id: "p2".to_string(),
  });

  let req = test::TestRequest::post()
    .uri("/wishlist")
    .set_json(json!({ "userId": "u1", "productId": "p1" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;

  let entries = body["products"].as_array().unwrap();
  assert_eq!(entries.len(), 2);
  assert_eq!(entries[0]["productId"], "p2");
  assert_eq!(entries[1]["productId"], "p1");
  assert_eq!(store.wishlist_writes(), 2);

  let req = test::TestRequest::get().uri("/wishlist/u1").to_request();
  let stored: Value = test::call_and_read_body_json(&app, req).await;
  assert_eq!(stored["products"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_wishlist_persistent_conflict_surfaces_as_409() {
  setup_tracing();
  let store = seeded_store();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(test_state(store.clone())))
      .configure(configure_app_routes),
  )
  .await;

  store.set_wishlist_fault(WishlistFault::AlwaysConflict);

  let req = test::TestRequest::post()
    .uri("/wishlist")
    .set_json(json!({ "userId": "u1", "productId": "p1" }))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
  assert_eq!(store.wishlist_writes(), test_config().document_write_attempts as usize);
}

#[actix_web::test]
async fn test_wishlist_storage_failure_is_generic_500() {
  setup_tracing();
  let store = seeded_store();
  let app = test::init_service(
    App::new()
      .app_data(web::Data::new(test_state(store.clone())))
      .configure(configure_app_routes),
  )
  .await;

  store.set_wishlist_fault(WishlistFault::AlwaysFail);

  let req = test::TestRequest::post()
    .uri("/wishlist")
    .set_json(json!({ "userId": "u1", "productId": "p1" }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body, json!({ "error": "Database operation failed" }));
  assert_eq!(store.wishlist_writes(), 1);
}
