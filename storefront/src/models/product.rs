// storefront/src/models/product.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
  #[serde(alias = "_id")]
  pub id: String,
  pub name: String,
  pub price: Decimal,
  pub category: String,
  pub image: String,
}

/// Products looked up for one response, indexed by id.
#[derive(Debug, Clone, Default)]
pub struct Catalog(HashMap<String, Product>);

impl Catalog {
  pub fn get(&self, product_id: &str) -> Option<&Product> {
    self.0.get(product_id)
  }
}

impl FromIterator<Product> for Catalog {
  fn from_iter<I: IntoIterator<Item = Product>>(iter: I) -> Self {
    Catalog(iter.into_iter().map(|p| (p.id.clone(), p)).collect())
  }
}
