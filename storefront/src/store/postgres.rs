// storefront/src/store/postgres.rs

//! Postgres-backed store. Carts and wishlists are kept as JSONB documents,
//! one row per user, guarded by a `revision` column.

use async_trait::async_trait;
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::types::Json;
use std::time::Duration;
use tracing::{info, instrument, warn};

use super::{Store, StoreError, StoreResult};
use crate::config::AppConfig;
use crate::models::{Cart, CartLine, Order, Product, Wishlist, WishlistEntry};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }

  /// Opens the pool, retrying the first connection with linear backoff, and
  /// applies pending migrations.
  pub async fn connect(config: &AppConfig, database_url: &str) -> StoreResult<Self> {
    let attempts = config.db_connect_attempts.max(1);
    let mut attempt = 1;
    let pool = loop {
      let result = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .test_before_acquire(true)
        .connect(database_url)
        .await;

      match result {
        Ok(pool) => break pool,
        Err(e) if attempt < attempts => {
          let wait = config.db_connect_backoff * attempt;
          warn!(attempt, max_attempts = attempts, error = %e, wait_ms = wait.as_millis() as u64, "Database connection failed, retrying.");
          tokio::time::sleep(wait).await;
          attempt += 1;
        }
        Err(e) => return Err(StoreError::Database(e)),
      }
    };
    info!(attempt, "Connected to the database.");

    MIGRATOR.run(&pool).await?;
    info!("Database migrations applied.");

    Ok(Self::new(pool))
  }

  /// Returns the stored document body and its revision.
  async fn load_document<T>(&self, table: &'static str, user_id: &str) -> StoreResult<Option<(Vec<T>, i64)>>
  where
    T: serde::de::DeserializeOwned + Send + Unpin + 'static,
  {
    let sql = format!("SELECT products, revision FROM {table} WHERE user_id = $1");
    let row = sqlx::query_as::<_, (Json<Vec<T>>, i64)>(&sql)
      .bind(user_id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.map(|(Json(body), revision)| (body, revision)))
  }

  /// Conditional write: insert when `expected` is zero, otherwise update the
  /// row only if it is still at `expected`.
  async fn save_document<T>(
    &self,
    table: &'static str,
    collection: &'static str,
    user_id: &str,
    body: &[T],
    expected: i64,
  ) -> StoreResult<i64>
  where
    T: serde::Serialize + Sync,
  {
    let body = Json(body);
    let sql = if expected == 0 {
      format!(
        "INSERT INTO {table} (user_id, products, revision, updated_at) VALUES ($1, $2, 1, NOW()) \
         ON CONFLICT (user_id) DO NOTHING RETURNING revision"
      )
    } else {
      format!(
        "UPDATE {table} SET products = $2, revision = revision + 1, updated_at = NOW() \
         WHERE user_id = $1 AND revision = $3 RETURNING revision"
      )
    };

    let mut query = sqlx::query_scalar::<_, i64>(&sql).bind(user_id).bind(body);
    if expected != 0 {
      query = query.bind(expected);
    }

    match query.fetch_optional(&self.pool).await? {
      Some(revision) => Ok(revision),
      None => Err(StoreError::Conflict {
        collection,
        key: user_id.to_string(),
      }),
    }
  }
}

const PRODUCT_COLUMNS: &str = "id, name, price, category, image";
const ORDER_COLUMNS: &str =
  "id, user_id, street, house, zip, city, first_name, last_name, email, phone, payment_method, created_at";

#[async_trait]
impl Store for PgStore {
  #[instrument(skip(self), err)]
  async fn list_products(&self) -> StoreResult<Vec<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products ORDER BY id ASC");
    Ok(sqlx::query_as::<_, Product>(&sql).fetch_all(&self.pool).await?)
  }

  async fn find_product(&self, product_id: &str) -> StoreResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1");
    Ok(
      sqlx::query_as::<_, Product>(&sql)
        .bind(product_id)
        .fetch_optional(&self.pool)
        .await?,
    )
  }

  async fn find_products(&self, product_ids: &[String]) -> StoreResult<Vec<Product>> {
    if product_ids.is_empty() {
      return Ok(Vec::new());
    }
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
    Ok(
      sqlx::query_as::<_, Product>(&sql)
        .bind(product_ids)
        .fetch_all(&self.pool)
        .await?,
    )
  }

  async fn count_products(&self) -> StoreResult<i64> {
    Ok(
      sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(&self.pool)
        .await?,
    )
  }

  #[instrument(skip(self, products), fields(count = products.len()), err)]
  async fn insert_products(&self, products: &[Product]) -> StoreResult<u64> {
    let mut tx = self.pool.begin().await?;
    let mut inserted = 0;
    for product in products {
      let result = sqlx::query(
        "INSERT INTO products (id, name, price, category, image) VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (id) DO NOTHING",
      )
      .bind(&product.id)
      .bind(&product.name)
      .bind(product.price)
      .bind(&product.category)
      .bind(&product.image)
      .execute(&mut *tx)
      .await?;
      inserted += result.rows_affected();
    }
    tx.commit().await?;
    Ok(inserted)
  }

  async fn load_cart(&self, user_id: &str) -> StoreResult<Option<Cart>> {
    let row = self.load_document::<CartLine>("carts", user_id).await?;
    Ok(row.map(|(products, revision)| Cart {
      user_id: user_id.to_string(),
      products,
      revision,
    }))
  }

  async fn save_cart(&self, cart: &Cart) -> StoreResult<Cart> {
    let revision = self
      .save_document("carts", "cart", &cart.user_id, &cart.products, cart.revision)
      .await?;
    Ok(Cart {
      revision,
      ..cart.clone()
    })
  }

  async fn load_wishlist(&self, user_id: &str) -> StoreResult<Option<Wishlist>> {
    let row = self.load_document::<WishlistEntry>("wishlists", user_id).await?;
    Ok(row.map(|(products, revision)| Wishlist {
      user_id: user_id.to_string(),
      products,
      revision,
    }))
  }

  async fn save_wishlist(&self, wishlist: &Wishlist) -> StoreResult<Wishlist> {
    let revision = self
      .save_document(
        "wishlists",
        "wishlist",
        &wishlist.user_id,
        &wishlist.products,
        wishlist.revision,
      )
      .await?;
    Ok(Wishlist {
      revision,
      ..wishlist.clone()
    })
  }

  #[instrument(skip(self, order), fields(order_id = %order.id, user_id = %order.user_id), err)]
  async fn insert_order(&self, order: &Order) -> StoreResult<()> {
    sqlx::query(
      "INSERT INTO orders (id, user_id, street, house, zip, city, first_name, last_name, email, phone, \
       payment_method, created_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(order.id)
    .bind(&order.user_id)
    .bind(&order.street)
    .bind(&order.house)
    .bind(&order.zip)
    .bind(&order.city)
    .bind(&order.first_name)
    .bind(&order.last_name)
    .bind(&order.email)
    .bind(&order.phone)
    .bind(&order.payment_method)
    .bind(order.created_at)
    .execute(&self.pool)
    .await?;
    Ok(())
  }

  async fn list_orders(&self, user_id: &str) -> StoreResult<Vec<Order>> {
    let sql = format!("SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC, id DESC");
    Ok(
      sqlx::query_as::<_, Order>(&sql)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?,
    )
  }

  async fn ping(&self) -> StoreResult<()> {
    sqlx::query("SELECT 1").execute(&self.pool).await?;
    Ok(())
  }
}
