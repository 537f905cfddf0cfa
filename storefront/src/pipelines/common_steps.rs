// storefront/src/pipelines/common_steps.rs

//! Helpers shared by the cart, wishlist and order pipelines.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::errors::{AppError, Result as AppResult};
use crate::models::{Cart, CartView, Catalog, Wishlist, WishlistView};
use crate::state::AppState;
use crate::store::{Store, StoreResult};

/// Returns every `(name, value)` pair whose value is trimmed and non-empty,
/// or a validation error listing all names that were missing or blank.
pub fn require_fields<const N: usize>(fields: [(&'static str, Option<&str>); N]) -> AppResult<[String; N]> {
  let missing: Vec<&str> = fields
    .iter()
    .filter(|(_, value)| value.map_or(true, |v| v.trim().is_empty()))
    .map(|(name, _)| *name)
    .collect();

  if !missing.is_empty() {
    return Err(AppError::Validation(format!(
      "Missing required fields: {}",
      missing.join(", ")
    )));
  }

  Ok(fields.map(|(_, value)| value.unwrap_or_default().trim().to_string()))
}

/// A per-user document stored under a revision check.
#[async_trait]
pub trait RevisionedDocument: Sized + Send + Sync {
  /// Name used in logs and not-found messages.
  const KIND: &'static str;

  fn empty(user_id: &str) -> Self;

  async fn load(store: &dyn Store, user_id: &str) -> StoreResult<Option<Self>>;

  async fn save(&self, store: &dyn Store) -> StoreResult<Self>;
}

#[async_trait]
impl RevisionedDocument for Cart {
  const KIND: &'static str = "Cart";

  fn empty(user_id: &str) -> Self {
    Cart::new(user_id)
  }

  async fn load(store: &dyn Store, user_id: &str) -> StoreResult<Option<Self>> {
    store.load_cart(user_id).await
  }

  async fn save(&self, store: &dyn Store) -> StoreResult<Self> {
    store.save_cart(self).await
  }
}

#[async_trait]
impl RevisionedDocument for Wishlist {
  const KIND: &'static str = "Wishlist";

  fn empty(user_id: &str) -> Self {
    Wishlist::new(user_id)
  }

  async fn load(store: &dyn Store, user_id: &str) -> StoreResult<Option<Self>> {
    store.load_wishlist(user_id).await
  }

  async fn save(&self, store: &dyn Store) -> StoreResult<Self> {
    store.save_wishlist(self).await
  }
}

/// Read-modify-write of one user's document under the store's revision check.
///
/// `apply` mutates the loaded document and reports whether anything changed;
/// an unchanged document is returned without a write. A lost race re-reads
/// the document and applies `apply` again, up to `document_write_attempts`
/// times. With `create` unset a missing document is `NotFound`.
#[instrument(name = "common_step::mutate_document", skip(state, apply), fields(kind = D::KIND, user_id = %user_id))]
pub async fn mutate_document<D, F>(state: &AppState, user_id: &str, create: bool, mut apply: F) -> AppResult<D>
where
  D: RevisionedDocument,
  F: FnMut(&mut D) -> AppResult<bool>,
{
  let store = state.store.as_ref();
  let attempts = state.config.document_write_attempts;
  let mut attempt = 1;
  loop {
    let mut doc = match D::load(store, user_id).await? {
      Some(doc) => doc,
      None if create => D::empty(user_id),
      None => return Err(AppError::NotFound(format!("{} for user '{user_id}' not found.", D::KIND))),
    };

    if !apply(&mut doc)? {
      debug!("{} unchanged, skipping write.", D::KIND);
      return Ok(doc);
    }

    match doc.save(store).await {
      Ok(saved) => return Ok(saved),
      Err(e) if e.is_conflict() && attempt < attempts => {
        warn!(attempt, max_attempts = attempts, "{} was modified concurrently, re-applying.", D::KIND);
        attempt += 1;
      }
      Err(e) => return Err(e.into()),
    }
  }
}

/// Prices a cart against the products as they are stored right now.
pub async fn resolve_cart(state: &AppState, cart: &Cart) -> AppResult<CartView> {
  let catalog: Catalog = state.store.find_products(&cart.product_ids()).await?.into_iter().collect();
  Ok(cart.resolve(&catalog))
}

pub async fn resolve_wishlist(state: &AppState, wishlist: &Wishlist) -> AppResult<WishlistView> {
  let catalog: Catalog = state
    .store
    .find_products(&wishlist.product_ids())
    .await?
    .into_iter()
    .collect();
  Ok(wishlist.resolve(&catalog))
}
