// storefront/src/models/wishlist.rs

use serde::{Deserialize, Serialize};

use super::product::{Catalog, Product};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
  pub product_id: String,
}

/// Per-user list of product references. Duplicate entries are allowed
/// unless the caller asks [`Wishlist::add`] to dedup.
#[derive(Debug, Clone, PartialEq)]
pub struct Wishlist {
  pub user_id: String,
  pub products: Vec<WishlistEntry>,
  pub revision: i64,
}

impl Wishlist {
  pub fn new(user_id: impl Into<String>) -> Self {
    Self {
      user_id: user_id.into(),
      products: Vec::new(),
      revision: 0,
    }
  }

  pub fn contains(&self, product_id: &str) -> bool {
    self.products.iter().any(|e| e.product_id == product_id)
  }

  /// Appends an entry; returns `false` when `dedup` is set and the product
  /// is already present.
  pub fn add(&mut self, product_id: &str, dedup: bool) -> bool {
    if dedup && self.contains(product_id) {
      return false;
    }
    self.products.push(WishlistEntry {
      product_id: product_id.to_string(),
    });
    true
  }

  pub fn remove(&mut self, product_id: &str) -> usize {
    let before = self.products.len();
    self.products.retain(|e| e.product_id != product_id);
    before - self.products.len()
  }

  pub fn product_ids(&self) -> Vec<String> {
    let mut ids: Vec<String> = self.products.iter().map(|e| e.product_id.clone()).collect();
    ids.sort();
    ids.dedup();
    ids
  }

  pub fn resolve(&self, catalog: &Catalog) -> WishlistView {
    WishlistView {
      user_id: self.user_id.clone(),
      products: self
        .products
        .iter()
        .map(|e| WishlistEntryView {
          product_id: e.product_id.clone(),
          product: catalog.get(&e.product_id).cloned(),
        })
        .collect(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntryView {
  pub product_id: String,
  pub product: Option<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistView {
  pub user_id: String,
  pub products: Vec<WishlistEntryView>,
}
