// storefront/src/main.rs

use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use storefront::config::{AppConfig, StoreBackend};
use storefront::errors::AppError;
use storefront::state::AppState;
use storefront::store::{catalog, MemoryStore, PgStore, Store};
use storefront::telemetry;
use storefront::web::configure_app_routes;
use tracing_actix_web::TracingLogger;

async fn build_store(config: &AppConfig) -> Result<Arc<dyn Store>, AppError> {
  match config.store_backend {
    StoreBackend::Postgres => {
      let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL is not set".to_string()))?;
      Ok(Arc::new(PgStore::connect(config, url).await?))
    }
    StoreBackend::Memory => {
      tracing::warn!("Using the in-memory store; nothing survives a restart.");
      Ok(Arc::new(MemoryStore::new()))
    }
  }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  let app_config = match AppConfig::from_env() {
    Ok(cfg) => cfg,
    Err(e) => {
      // No subscriber yet.
      eprintln!("Failed to load application configuration: {e}");
      std::process::exit(1);
    }
  };
  telemetry::init_tracing(app_config.log_format);
  tracing::info!(backend = ?app_config.store_backend, "Starting storefront server...");

  let store = match build_store(&app_config).await {
    Ok(store) => store,
    Err(e) => {
      tracing::error!(error = %e, "Failed to initialise the store.");
      std::process::exit(1);
    }
  };

  if app_config.seed_catalog {
    if let Err(e) = catalog::seed_if_empty(store.as_ref(), &app_config.catalog_path).await {
      tracing::error!(error = %e, "Failed to seed the product catalog.");
      std::process::exit(1);
    }
  }

  let server_address = app_config.bind_address();
  let app_state = AppState::new(store, app_config);

  tracing::info!("Attempting to bind server to {}...", server_address);
  HttpServer::new(move || {
    App::new()
      .app_data(web::Data::new(app_state.clone()))
      .wrap(TracingLogger::default())
      .configure(configure_app_routes)
  })
  .bind(&server_address)?
  .run()
  .await
}
