// storefront/src/store/mod.rs

//! Persistence behind one async trait.
//!
//! Carts and wishlists are whole documents written with compare-and-swap on
//! their `revision`: a save succeeds only if the stored revision still equals
//! the revision the document was read at (zero meaning "must not exist yet").
//! A successful save returns the document with the bumped revision.

pub mod catalog;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Cart, Order, Product, Wishlist};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("revision conflict on {collection} '{key}'")]
  Conflict { collection: &'static str, key: String },

  #[error("database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("migration error: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("document encoding error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("catalog error: {0}")]
  Catalog(String),
}

impl StoreError {
  pub fn is_conflict(&self) -> bool {
    matches!(self, StoreError::Conflict { .. })
  }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait Store: Send + Sync {
  async fn list_products(&self) -> StoreResult<Vec<Product>>;
  async fn find_product(&self, product_id: &str) -> StoreResult<Option<Product>>;
  /// Products for the given ids; unknown ids are silently absent.
  async fn find_products(&self, product_ids: &[String]) -> StoreResult<Vec<Product>>;
  async fn count_products(&self) -> StoreResult<i64>;
  /// Inserts products, leaving any id that already exists untouched.
  async fn insert_products(&self, products: &[Product]) -> StoreResult<u64>;

  async fn load_cart(&self, user_id: &str) -> StoreResult<Option<Cart>>;
  async fn save_cart(&self, cart: &Cart) -> StoreResult<Cart>;

  async fn load_wishlist(&self, user_id: &str) -> StoreResult<Option<Wishlist>>;
  async fn save_wishlist(&self, wishlist: &Wishlist) -> StoreResult<Wishlist>;

  async fn insert_order(&self, order: &Order) -> StoreResult<()>;
  /// Newest first.
  async fn list_orders(&self, user_id: &str) -> StoreResult<Vec<Order>>;

  async fn ping(&self) -> StoreResult<()>;
}
