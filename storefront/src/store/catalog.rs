// storefront/src/store/catalog.rs

//! One-time catalog seeding from a static JSON file.

use rust_decimal::Decimal;
use std::path::Path;
use tracing::{info, instrument};

use super::{Store, StoreError, StoreResult};
use crate::models::Product;

/// Parses a JSON array of products, rejecting blank ids and negative prices.
pub fn parse_catalog(raw: &str) -> StoreResult<Vec<Product>> {
  let products: Vec<Product> = serde_json::from_str(raw)?;
  for product in &products {
    if product.id.trim().is_empty() {
      return Err(StoreError::Catalog(format!("product '{}' has no id", product.name)));
    }
    if product.price < Decimal::ZERO {
      return Err(StoreError::Catalog(format!("product '{}' has a negative price", product.id)));
    }
  }
  Ok(products)
}

/// Loads `path` into the store only when the product collection is empty.
/// Returns the number of products inserted.
#[instrument(skip(store), fields(path = %path.display()), err)]
pub async fn seed_if_empty(store: &dyn Store, path: &Path) -> StoreResult<u64> {
  let existing = store.count_products().await?;
  if existing > 0 {
    info!(existing, "Catalog already populated, skipping seed.");
    return Ok(0);
  }

  let raw = tokio::fs::read_to_string(path)
    .await
    .map_err(|e| StoreError::Catalog(format!("cannot read {}: {e}", path.display())))?;
  let products = parse_catalog(&raw)?;
  let inserted = store.insert_products(&products).await?;
  info!(inserted, "Catalog seeded.");
  Ok(inserted)
}
