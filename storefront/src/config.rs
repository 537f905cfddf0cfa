// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Postgres,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(Self::Postgres),
      "memory" => Ok(Self::Memory),
      other => Err(AppError::Config(format!("Unknown STORE_BACKEND '{other}'"))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "pretty" | "text" => Ok(Self::Pretty),
      "json" => Ok(Self::Json),
      other => Err(AppError::Config(format!("Unknown LOG_FORMAT '{other}'"))),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  pub store_backend: StoreBackend,
  pub database_url: Option<String>,
  pub db_max_connections: u32,
  pub db_connect_attempts: u32,
  pub db_connect_backoff: Duration,

  pub catalog_path: PathBuf,
  pub seed_catalog: bool,

  /// Times a cart or wishlist read-modify-write is applied before a
  /// revision conflict is reported to the caller.
  pub document_write_attempts: u32,
  /// Times the order workflow tries to empty the cart after the order is stored.
  pub cart_clear_attempts: u32,
  pub wishlist_dedup: bool,

  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 7878,
      store_backend: StoreBackend::Postgres,
      database_url: None,
      db_max_connections: 10,
      db_connect_attempts: 5,
      db_connect_backoff: Duration::from_millis(500),
      catalog_path: PathBuf::from("data/products.json"),
      seed_catalog: true,
      document_write_attempts: 3,
      cart_clear_attempts: 3,
      wishlist_dedup: false,
      log_format: LogFormat::Pretty,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // .env is optional

    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from an arbitrary variable source; unset variables
  /// keep their defaults.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let defaults = Self::default();

    let parsed = |name: &str| -> Option<String> { lookup(name).filter(|v| !v.trim().is_empty()) };

    fn parse_var<T: FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T>
    where
      T::Err: std::fmt::Display,
    {
      match raw {
        Some(value) => value
          .trim()
          .parse::<T>()
          .map_err(|e| AppError::Config(format!("Invalid {name} '{value}': {e}"))),
        None => Ok(default),
      }
    }

    let store_backend = match parsed("STORE_BACKEND") {
      Some(value) => value.parse::<StoreBackend>()?,
      None => defaults.store_backend,
    };
    let log_format = match parsed("LOG_FORMAT") {
      Some(value) => value.parse::<LogFormat>()?,
      None => defaults.log_format,
    };

    let database_url = parsed("DATABASE_URL");
    if store_backend == StoreBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required when STORE_BACKEND=postgres)".to_string(),
      ));
    }

    let backoff_ms = parse_var("DB_CONNECT_BACKOFF_MS", parsed("DB_CONNECT_BACKOFF_MS"), 500u64)?;

    let config = Self {
      server_host: parsed("SERVER_HOST").unwrap_or(defaults.server_host),
      server_port: parse_var("SERVER_PORT", parsed("SERVER_PORT"), defaults.server_port)?,
      store_backend,
      database_url,
      db_max_connections: parse_var("DB_MAX_CONNECTIONS", parsed("DB_MAX_CONNECTIONS"), defaults.db_max_connections)?,
      db_connect_attempts: parse_var(
        "DB_CONNECT_ATTEMPTS",
        parsed("DB_CONNECT_ATTEMPTS"),
        defaults.db_connect_attempts,
      )?,
      db_connect_backoff: Duration::from_millis(backoff_ms),
      catalog_path: parsed("CATALOG_PATH").map(PathBuf::from).unwrap_or(defaults.catalog_path),
      seed_catalog: parse_var("SEED_CATALOG", parsed("SEED_CATALOG"), defaults.seed_catalog)?,
      document_write_attempts: parse_var(
        "DOCUMENT_WRITE_ATTEMPTS",
        parsed("DOCUMENT_WRITE_ATTEMPTS"),
        defaults.document_write_attempts,
      )?,
      cart_clear_attempts: parse_var(
        "CART_CLEAR_ATTEMPTS",
        parsed("CART_CLEAR_ATTEMPTS"),
        defaults.cart_clear_attempts,
      )?,
      wishlist_dedup: parse_var("WISHLIST_DEDUP", parsed("WISHLIST_DEDUP"), defaults.wishlist_dedup)?,
      log_format,
    };

    for (name, value) in [
      ("DB_MAX_CONNECTIONS", config.db_max_connections),
      ("DB_CONNECT_ATTEMPTS", config.db_connect_attempts),
      ("DOCUMENT_WRITE_ATTEMPTS", config.document_write_attempts),
      ("CART_CLEAR_ATTEMPTS", config.cart_clear_attempts),
    ] {
      if value == 0 {
        return Err(AppError::Config(format!("{name} must be at least 1")));
      }
    }

    Ok(config)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
