// storefront/src/pipelines/contexts.rs

//! Data structs the storefront pipelines run over. Handlers receive them
//! wrapped in `stepflow::ContextData`.
//!
//! Request inputs arrive with every field optional so the validation step,
//! not the JSON extractor, decides which fields are missing.

use serde::Deserialize;

use crate::models::{CartView, Order, QuantityOperation, ShippingDetails, WishlistView};
use crate::state::AppState;

// --- Raw inputs ---

/// Body shared by POST, DELETE and PATCH /cart.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineInput {
  pub user_id: Option<String>,
  pub product_id: Option<String>,
  pub size: Option<String>,
  pub quantity: Option<i64>,
  pub operation: Option<QuantityOperation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistInput {
  pub user_id: Option<String>,
  pub product_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderInput {
  pub user_id: Option<String>,
  pub street: Option<String>,
  pub house: Option<String>,
  pub zip: Option<String>,
  pub city: Option<String>,
  pub first_name: Option<String>,
  pub last_name: Option<String>,
  pub email: Option<String>,
  pub phone: Option<String>,
  pub payment_method: Option<String>,
}

// --- Validated keys ---

/// Identifies one cart line of one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineKey {
  pub user_id: String,
  pub product_id: String,
  pub size: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WishlistKey {
  pub user_id: String,
  pub product_id: String,
}

// --- Cart ---

#[derive(Clone)]
pub struct AddToCartCtxData {
  pub app_state: AppState,
  pub input: CartLineInput,
  pub key: Option<CartLineKey>,
  pub quantity: u32,
  pub cart: Option<CartView>,
}

impl AddToCartCtxData {
  pub fn new(app_state: AppState, input: CartLineInput) -> Self {
    Self {
      app_state,
      input,
      key: None,
      quantity: 1,
      cart: None,
    }
  }
}

#[derive(Clone)]
pub struct RemoveFromCartCtxData {
  pub app_state: AppState,
  pub input: CartLineInput,
  pub key: Option<CartLineKey>,
  pub cart: Option<CartView>,
}

impl RemoveFromCartCtxData {
  pub fn new(app_state: AppState, input: CartLineInput) -> Self {
    Self {
      app_state,
      input,
      key: None,
      cart: None,
    }
  }
}

#[derive(Clone)]
pub struct UpdateCartQuantityCtxData {
  pub app_state: AppState,
  pub input: CartLineInput,
  pub key: Option<CartLineKey>,
  pub operation: Option<QuantityOperation>,
  pub cart: Option<CartView>,
}

impl UpdateCartQuantityCtxData {
  pub fn new(app_state: AppState, input: CartLineInput) -> Self {
    Self {
      app_state,
      input,
      key: None,
      operation: None,
      cart: None,
    }
  }
}

// --- Wishlist ---

#[derive(Clone)]
pub struct AddToWishlistCtxData {
  pub app_state: AppState,
  pub input: WishlistInput,
  pub key: Option<WishlistKey>,
  pub wishlist: Option<WishlistView>,
}

impl AddToWishlistCtxData {
  pub fn new(app_state: AppState, input: WishlistInput) -> Self {
    Self {
      app_state,
      input,
      key: None,
      wishlist: None,
    }
  }
}

#[derive(Clone)]
pub struct RemoveFromWishlistCtxData {
  pub app_state: AppState,
  pub input: WishlistInput,
  pub key: Option<WishlistKey>,
  pub wishlist: Option<WishlistView>,
}

impl RemoveFromWishlistCtxData {
  pub fn new(app_state: AppState, input: WishlistInput) -> Self {
    Self {
      app_state,
      input,
      key: None,
      wishlist: None,
    }
  }
}

// --- Orders ---

#[derive(Clone)]
pub struct PlaceOrderCtxData {
  pub app_state: AppState,
  pub input: PlaceOrderInput,
  pub user_id: Option<String>,
  pub shipping: Option<ShippingDetails>,
  pub order: Option<Order>,
  /// False when every clear attempt failed; the order stands regardless.
  pub cart_cleared: bool,
}

impl PlaceOrderCtxData {
  pub fn new(app_state: AppState, input: PlaceOrderInput) -> Self {
    Self {
      app_state,
      input,
      user_id: None,
      shipping: None,
      order: None,
      cart_cleared: false,
    }
  }
}
