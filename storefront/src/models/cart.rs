// storefront/src/models/cart.rs

//! The cart aggregate.
//!
//! A cart holds one line per `(product_id, size)`. Quantities never drop below
//! one: decrementing stops at one and removal is a separate operation. Line
//! totals are never stored; [`Cart::resolve`] prices every line against the
//! catalog at read time.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::product::{Catalog, Product};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub product_id: String,
  pub size: String,
  pub quantity: u32,
}

impl CartLine {
  fn matches(&self, product_id: &str, size: &str) -> bool {
    self.product_id == product_id && self.size == size
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuantityOperation {
  Increment,
  Decrement,
}

impl QuantityOperation {
  pub fn apply(self, quantity: u32) -> u32 {
    match self {
      QuantityOperation::Increment => quantity.saturating_add(1),
      QuantityOperation::Decrement => quantity.saturating_sub(1).max(1),
    }
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
  pub user_id: String,
  pub products: Vec<CartLine>,
  /// Store revision this copy was read at; zero for a cart never persisted.
  pub revision: i64,
}

impl Cart {
  pub fn new(user_id: impl Into<String>) -> Self {
    Self {
      user_id: user_id.into(),
      products: Vec::new(),
      revision: 0,
    }
  }

  pub fn line(&self, product_id: &str, size: &str) -> Option<&CartLine> {
    self.products.iter().find(|l| l.matches(product_id, size))
  }

  /// Merges `quantity` into the `(product_id, size)` line, appending a new
  /// line when there is none.
  pub fn add(&mut self, product_id: &str, size: &str, quantity: u32) {
    match self.products.iter_mut().find(|l| l.matches(product_id, size)) {
      Some(line) => line.quantity = line.quantity.saturating_add(quantity),
      None => self.products.push(CartLine {
        product_id: product_id.to_string(),
        size: size.to_string(),
        quantity: quantity.max(1),
      }),
    }
  }

  /// Drops every line for `(product_id, size)`; returns how many went.
  pub fn remove(&mut self, product_id: &str, size: &str) -> usize {
    let before = self.products.len();
    self.products.retain(|l| !l.matches(product_id, size));
    before - self.products.len()
  }

  /// Returns the new quantity, or `None` when the cart has no such line.
  pub fn update_quantity(&mut self, product_id: &str, size: &str, op: QuantityOperation) -> Option<u32> {
    let line = self.products.iter_mut().find(|l| l.matches(product_id, size))?;
    line.quantity = op.apply(line.quantity);
    Some(line.quantity)
  }

  /// Empties the cart; `false` if it was already empty.
  pub fn clear(&mut self) -> bool {
    let had_lines = !self.products.is_empty();
    self.products.clear();
    had_lines
  }

  pub fn product_ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self.products.iter().map(|l| l.product_id.clone()).collect();
    ids.sort();
    ids.dedup();
    ids
  }

  pub fn resolve(&self, catalog: &Catalog) -> CartView {
    let products: Vec<CartLineView> = self
      .products
      .iter()
      .map(|line| {
        let product = catalog.get(&line.product_id).cloned();
        CartLineView {
          product_id: line.product_id.clone(),
          size: line.size.clone(),
          quantity: line.quantity,
          total_price: product.as_ref().map(|p| p.price * Decimal::from(line.quantity)),
          product,
        }
      })
      .collect();
    let subtotal = products.iter().filter_map(|l| l.total_price).sum();

    CartView {
      user_id: self.user_id.clone(),
      products,
      subtotal,
    }
  }
}

/// A cart line priced against the current catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
  pub product_id: String,
  pub size: String,
  pub quantity: u32,
  /// `None` when the product has left the catalog.
  pub total_price: Option<Decimal>,
  pub product: Option<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
  pub user_id: String,
  pub products: Vec<CartLineView>,
  pub subtotal: Decimal,
}
