// storefront/src/lib.rs

//! Storefront backend: product listing, per-user carts and wishlists, and
//! order placement over actix-web. Every mutation runs as a `stepflow`
//! pipeline registered on [`state::AppState`].

pub mod config;
pub mod errors;
pub mod models;
pub mod pipelines;
pub mod state;
pub mod store;
pub mod telemetry;
pub mod web;
