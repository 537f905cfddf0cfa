// storefront/src/store/memory.rs

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};

use super::{Store, StoreError, StoreResult};
use crate::models::{Cart, CartLine, Order, Product, Wishlist, WishlistEntry};

#[derive(Debug, Clone)]
struct Document<T> {
  body: Vec<T>,
  revision: i64,
}

/// Process-local store backing tests and `STORE_BACKEND=memory`.
#[derive(Debug, Default)]
pub struct MemoryStore {
  products: RwLock<BTreeMap<String, Product>>,
  carts: RwLock<HashMap<String, Document<CartLine>>>,
  wishlists: RwLock<HashMap<String, Document<WishlistEntry>>>,
  orders: RwLock<Vec<Order>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
    let store = Self::new();
    store
      .products
      .write()
      .extend(products.into_iter().map(|p| (p.id.clone(), p)));
    store
  }

  /// Replaces a product in place; used to model catalog price changes.
  pub fn upsert_product(&self, product: Product) {
    self.products.write().insert(product.id.clone(), product);
  }

  pub fn order_count(&self) -> usize {
    self.orders.read().len()
  }
}

fn compare_and_swap<T: Clone>(
  docs: &RwLock<HashMap<String, Document<T>>>,
  collection: &'static str,
  key: &str,
  body: &[T],
  expected: i64,
) -> StoreResult<i64> {
  let mut docs = docs.write();
  let current = docs.get(key).map_or(0, |d| d.revision);
  if current != expected {
    return Err(StoreError::Conflict {
      collection,
      key: key.to_string(),
    });
  }
  let revision = expected + 1;
  docs.insert(
    key.to_string(),
    Document {
      body: body.to_vec(),
      revision,
    },
  );
  Ok(revision)
}

#[async_trait]
impl Store for MemoryStore {
  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    Ok(self.products.read().values().cloned().collect())
  }

  async fn find_product(&self, product_id: &str) -> StoreResult<Option<Product>> {
    Ok(self.products.read().get(product_id).cloned())
  }

  async fn find_products(&self, product_ids: &[String]) -> StoreResult<Vec<Product>> {
    let products = self.products.read();
    Ok(product_ids.iter().filter_map(|id| products.get(id).cloned()).collect())
  }

  async fn count_products(&self) -> StoreResult<i64> {
    Ok(self.products.read().len() as i64)
  }

  async fn insert_products(&self, products: &[Product]) -> StoreResult<u64> {
    let mut stored = self.products.write();
    let mut inserted = 0;
    for product in products {
      if !stored.contains_key(&product.id) {
        stored.insert(product.id.clone(), product.clone());
        inserted += 1;
      }
    }
    Ok(inserted)
  }

  async fn load_cart(&self, user_id: &str) -> StoreResult<Option<Cart>> {
    Ok(self.carts.read().get(user_id).map(|doc| Cart {
      user_id: user_id.to_string(),
      products: doc.body.clone(),
      revision: doc.revision,
    }))
  }

  async fn save_cart(&self, cart: &Cart) -> StoreResult<Cart> {
    let revision = compare_and_swap(&self.carts, "cart", &cart.user_id, &cart.products, cart.revision)?;
    Ok(Cart {
      revision,
      ..cart.clone()
    })
  }

  async fn load_wishlist(&self, user_id: &str) -> StoreResult<Option<Wishlist>> {
    Ok(self.wishlists.read().get(user_id).map(|doc| Wishlist {
      user_id: user_id.to_string(),
      products: doc.body.clone(),
      revision: doc.revision,
    }))
  }

  async fn save_wishlist(&self, wishlist: &Wishlist) -> StoreResult<Wishlist> {
    let revision = compare_and_swap(
      &self.wishlists,
      "wishlist",
      &wishlist.user_id,
      &wishlist.products,
      wishlist.revision,
    )?;
    Ok(Wishlist {
      revision,
      ..wishlist.clone()
    })
  }

  async fn insert_order(&self, order: &Order) -> StoreResult<()> {
    self.orders.write().push(order.clone());
    Ok(())
  }

  async fn list_orders(&self, user_id: &str) -> StoreResult<Vec<Order>> {
    let mut orders: Vec<Order> = self
      .orders
      .read()
      .iter()
      .rev()
      .filter(|o| o.user_id == user_id)
      .cloned()
      .collect();
    // Later inserts stay first on equal timestamps.
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(orders)
  }

  async fn ping(&self) -> StoreResult<()> {
    Ok(())
  }
}
