// storefront/tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use storefront::config::{AppConfig, StoreBackend};
use storefront::models::{Cart, Order, Product, Wishlist};
use storefront::state::AppState;
use storefront::store::{MemoryStore, Store, StoreError, StoreResult};
use tracing::Level;

static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn product(id: &str, price: i64) -> Product {
  Product {
    id: id.to_string(),
    name: format!("Product {id}"),
    price: Decimal::from(price),
    category: "shirts".to_string(),
    image: format!("/images/{id}.jpg"),
  }
}

pub fn test_config() -> AppConfig {
  AppConfig {
    store_backend: StoreBackend::Memory,
    ..AppConfig::default()
  }
}

/// `p1` at 10 and `p2` at 25.
pub fn seeded_store() -> Arc<FaultyStore> {
  Arc::new(FaultyStore::new(MemoryStore::with_products([product("p1", 10), product("p2", 25)])))
}

pub fn test_state(store: Arc<FaultyStore>) -> AppState {
  AppState::new(store, test_config())
}

pub fn order_body(user_id: &str) -> Value {
  json!({
    "userId": user_id,
    "street": "Main St",
    "house": "12",
    "zip": "10115",
    "city": "Berlin",
    "firstName": "Ada",
    "lastName": "Lovelace",
    "email": "ada@example.com",
    "phone": "+49 30 1234",
    "paymentMethod": "card"
  })
}

/// How the next cart writes misbehave.
#[derive(Debug, Clone, Default)]
pub enum CartFault {
  #[default]
  None,
  /// Before the next write lands, a rival writer adds this line.
  RaceOnce { product_id: String, size: String },
  AlwaysConflict,
  AlwaysFail,
}

/// How the next wishlist writes misbehave.
#[derive(Debug, Clone, Default)]
pub enum WishlistFault {
  #[default]
  None,
  /// Before the next write lands, a rival writer adds this entry.
  RaceOnce { product_id: String },
  AlwaysConflict,
  AlwaysFail,
}

/// Delegates to a [`MemoryStore`] with injectable cart and wishlist write faults.
pub struct FaultyStore {
  pub inner: MemoryStore,
  cart_fault: Mutex<CartFault>,
  cart_writes: AtomicUsize,
  wishlist_fault: Mutex<WishlistFault>,
  wishlist_writes: AtomicUsize,
}

impl FaultyStore {
  pub fn new(inner: MemoryStore) -> Self {
    Self {
      inner,
      cart_fault: Mutex::new(CartFault::None),
      cart_writes: AtomicUsize::new(0),
      wishlist_fault: Mutex::new(WishlistFault::None),
      wishlist_writes: AtomicUsize::new(0),
    }
  }

  pub fn set_cart_fault(&self, fault: CartFault) {
    *self.cart_fault.lock() = fault;
  }

  /// Attempted cart writes, successful or not.
  pub fn cart_writes(&self) -> usize {
    self.cart_writes.load(Ordering::SeqCst)
  }

  pub fn set_wishlist_fault(&self, fault: WishlistFault) {
    *self.wishlist_fault.lock() = fault;
  }

  /// Attempted wishlist writes, successful or not.
  pub fn wishlist_writes(&self) -> usize {
    self.wishlist_writes.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl Store for FaultyStore {
  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    self.inner.list_products().await
  }

  async fn find_product(&self, product_id: &str) -> StoreResult<Option<Product>> {
    self.inner.find_product(product_id).await
  }

  async fn find_products(&self, product_ids: &[String]) -> StoreResult<Vec<Product>> {
    self.inner.find_products(product_ids).await
  }

  async fn count_products(&self) -> StoreResult<i64> {
    self.inner.count_products().await
  }

  async fn insert_products(&self, products: &[Product]) -> StoreResult<u64> {
    self.inner.insert_products(products).await
  }

  async fn load_cart(&self, user_id: &str) -> StoreResult<Option<Cart>> {
    self.inner.load_cart(user_id).await
  }

  async fn save_cart(&self, cart: &Cart) -> StoreResult<Cart> {
    self.cart_writes.fetch_add(1, Ordering::SeqCst);
    let fault = self.cart_fault.lock().clone();
    match fault {
      CartFault::None => self.inner.save_cart(cart).await,
      CartFault::RaceOnce { product_id, size } => {
        self.set_cart_fault(CartFault::None);
        let mut rival = self
          .inner
          .load_cart(&cart.user_id)
          .await?
          .unwrap_or_else(|| Cart::new(cart.user_id.clone()));
        rival.add(&product_id, &size, 1);
        self.inner.save_cart(&rival).await?;
        self.inner.save_cart(cart).await
      }
      CartFault::AlwaysConflict => Err(StoreError::Conflict {
        collection: "cart",
        key: cart.user_id.clone(),
      }),
      CartFault::AlwaysFail => Err(StoreError::Database(sqlx::Error::PoolTimedOut)),
    }
  }

  async fn load_wishlist(&self, user_id: &str) -> StoreResult<Option<Wishlist>> {
    self.inner.load_wishlist(user_id).await
  }

  async fn save_wishlist(&self, wishlist: &Wishlist) -> StoreResult<Wishlist> {
    self.wishlist_writes.fetch_add(1, Ordering::SeqCst);
    let fault = self.wishlist_fault.lock().clone();
    match fault {
      WishlistFault::None => self.inner.save_wishlist(wishlist).await,
      WishlistFault::RaceOnce { product_id } => {
        self.set_wishlist_fault(WishlistFault::None);
        let mut rival = self
          .inner
          .load_wishlist(&wishlist.user_id)
          .await?
          .unwrap_or_else(|| Wishlist::new(wishlist.user_id.clone()));
        rival.add(&product_id, false);
        self.inner.save_wishlist(&rival).await?;
        self.inner.save_wishlist(wishlist).await
      }
      WishlistFault::AlwaysConflict => Err(StoreError::Conflict {
        collection: "wishlist",
        key: wishlist.user_id.clone(),
      }),
      WishlistFault::AlwaysFail => Err(StoreError::Database(sqlx::Error::PoolTimedOut)),
    }
  }

  async fn insert_order(&self, order: &Order) -> StoreResult<()> {
    self.inner.insert_order(order).await
  }

  async fn list_orders(&self, user_id: &str) -> StoreResult<Vec<Order>> {
    self.inner.list_orders(user_id).await
  }

  async fn ping(&self) -> StoreResult<()> {
    self.inner.ping().await
  }
}
